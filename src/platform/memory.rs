//! In-memory storage and signal dispatch
//!
//! Used by native hosts and by the test suite. Mirrors the browser
//! semantics closely enough that sessions behave the same on both.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Environment, ListenerId, Signal, SignalHandler, SignalTarget, StorageArea, StorageScope};
use crate::error::{PersistError, Result};

/// Listener registry shared by in-memory forms and environments
#[derive(Default)]
pub struct SignalBus {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Signal, SignalHandler)>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every handler attached for `signal`, in attach order.
    ///
    /// Handlers may attach or detach listeners while running; the set
    /// dispatched is the one armed when `emit` was called.
    pub fn emit(&self, signal: Signal) {
        let handlers: Vec<SignalHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .map(|(_, _, h)| Rc::clone(h))
            .collect();

        log::debug!("Dispatching {} to {} listener(s)", signal, handlers.len());
        for handler in handlers {
            handler();
        }
    }

    /// Number of handlers currently armed for `signal`
    pub fn listener_count(&self, signal: Signal) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .count()
    }
}

impl SignalTarget for SignalBus {
    fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, signal, handler));
        Ok(id)
    }

    fn detach(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _, _)| *lid != id);
    }
}

/// Size-bounded in-memory storage area
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
    /// Maximum total bytes of keys plus values, `None` for unbounded
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RefCell::default(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Whether `key` currently holds a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let replaced = self
                .items
                .borrow()
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(PersistError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Native stand-in for the browser window
#[derive(Default)]
pub struct MemoryEnvironment {
    local: Rc<MemoryStorage>,
    session: Rc<MemoryStorage>,
    bus: SignalBus,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment backed by the given storage areas
    pub fn with_storage(local: Rc<MemoryStorage>, session: Rc<MemoryStorage>) -> Self {
        Self {
            local,
            session,
            bus: SignalBus::new(),
        }
    }

    pub fn local_storage(&self) -> &Rc<MemoryStorage> {
        &self.local
    }

    pub fn session_storage(&self) -> &Rc<MemoryStorage> {
        &self.session
    }

    /// Fire a window-level signal
    pub fn emit(&self, signal: Signal) {
        self.bus.emit(signal);
    }

    pub fn listener_count(&self, signal: Signal) -> usize {
        self.bus.listener_count(signal)
    }
}

impl SignalTarget for MemoryEnvironment {
    fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId> {
        self.bus.attach(signal, handler)
    }

    fn detach(&self, id: ListenerId) {
        self.bus.detach(id);
    }
}

impl Environment for MemoryEnvironment {
    fn storage(&self, scope: StorageScope) -> Result<Rc<dyn StorageArea>> {
        let area: Rc<dyn StorageArea> = match scope {
            StorageScope::Local => self.local.clone(),
            StorageScope::Session => self.session.clone(),
        };
        Ok(area)
    }
}
