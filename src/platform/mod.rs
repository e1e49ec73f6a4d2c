//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage / SessionStorage on web, in-memory natively)
//! - Lifecycle signals (navigation, unload, form submit)
//!
//! Everything above this layer talks to the traits defined here, so the
//! persistence core never touches `web_sys` directly.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

pub use memory::{MemoryEnvironment, MemoryStorage, SignalBus};
#[cfg(target_arch = "wasm32")]
pub use web::{BrowserEnvironment, WebStorage};

/// Lifecycle signals a persist session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// In-app history navigation (back/forward)
    NavigationChange,
    /// The page is about to unload; still cancelable
    BeforeUnload,
    /// The page is unloading; no signals follow
    Unload,
    /// The form was submitted
    Submit,
}

impl Signal {
    /// DOM event name backing this signal
    pub fn event_name(&self) -> &'static str {
        match self {
            Signal::NavigationChange => "popstate",
            Signal::BeforeUnload => "beforeunload",
            Signal::Unload => "unload",
            Signal::Submit => "submit",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Handle returned by [`SignalTarget::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback invoked when a signal fires
pub type SignalHandler = Rc<dyn Fn()>;

/// Anything that emits lifecycle signals (the window, a form)
pub trait SignalTarget {
    /// Register `handler` for `signal`
    fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId>;

    /// Remove a previously attached handler. Unknown ids are ignored.
    fn detach(&self, id: ListenerId);
}

/// Which storage area a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageScope {
    /// Survives browser restarts (`localStorage`)
    #[default]
    Local,
    /// Cleared when the tab closes (`sessionStorage`)
    Session,
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageScope::Local => f.write_str("local"),
            StorageScope::Session => f.write_str("session"),
        }
    }
}

/// Synchronous string key-value store, last write wins
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Host environment: storage areas plus window-level lifecycle signals
pub trait Environment: SignalTarget {
    fn storage(&self, scope: StorageScope) -> Result<Rc<dyn StorageArea>>;
}
