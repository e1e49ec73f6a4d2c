//! Browser platform: Web Storage and window lifecycle events

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, Storage, Window};

use super::{Environment, ListenerId, Signal, SignalHandler, SignalTarget, StorageArea, StorageScope};
use crate::error::{PersistError, Result};

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Event listeners owned on behalf of one DOM target
///
/// Closures stay alive while attached and are dropped on detach.
pub(crate) struct DomListeners {
    target: EventTarget,
    next_id: Cell<u64>,
    closures: RefCell<HashMap<u64, (&'static str, Closure<dyn FnMut(Event)>)>>,
}

impl DomListeners {
    pub(crate) fn new(target: EventTarget) -> Self {
        Self {
            target,
            next_id: Cell::new(0),
            closures: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId> {
        let event = signal.event_name();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| handler());
        self.target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| PersistError::Listener {
                signal: event,
                reason: js_error(err),
            })?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.closures.borrow_mut().insert(id, (event, closure));
        Ok(ListenerId(id))
    }

    pub(crate) fn detach(&self, id: ListenerId) {
        let removed = self.closures.borrow_mut().remove(&id.0);
        if let Some((event, closure)) = removed {
            let _ = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// `localStorage` or `sessionStorage`
pub struct WebStorage(Storage);

impl StorageArea for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.0
            .get_item(key)
            .map_err(|err| PersistError::Storage(js_error(err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // Quota errors surface here as DOMException
        self.0
            .set_item(key, value)
            .map_err(|err| PersistError::Storage(js_error(err)))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.0
            .remove_item(key)
            .map_err(|err| PersistError::Storage(js_error(err)))
    }
}

/// The browser window: storage areas plus popstate/beforeunload/unload
pub struct BrowserEnvironment {
    window: Window,
    listeners: DomListeners,
}

impl BrowserEnvironment {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(PersistError::NoWindow)?;
        let target: EventTarget = window.clone().into();
        Ok(Self {
            window,
            listeners: DomListeners::new(target),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl SignalTarget for BrowserEnvironment {
    fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId> {
        self.listeners.attach(signal, handler)
    }

    fn detach(&self, id: ListenerId) {
        self.listeners.detach(id);
    }
}

impl Environment for BrowserEnvironment {
    fn storage(&self, scope: StorageScope) -> Result<Rc<dyn StorageArea>> {
        let storage = match scope {
            StorageScope::Local => self.window.local_storage(),
            StorageScope::Session => self.window.session_storage(),
        };
        let storage = storage
            .ok()
            .flatten()
            .ok_or(PersistError::StorageUnavailable(scope))?;
        Ok(Rc::new(WebStorage(storage)))
    }
}
