//! Form Persist - keep form drafts across reloads
//!
//! Core modules:
//! - `form`: Form/element model and an in-memory implementation
//! - `persistence`: Serialize, restore, filter, and auto-persist sessions
//! - `platform`: Storage and lifecycle signals (Web Storage on wasm32)
//! - `settings`: Per-form configuration

pub mod error;
pub mod form;
pub mod persistence;
pub mod platform;
pub mod settings;

pub use error::{PersistError, Result};
pub use form::{ElementKind, Form, FormElement, MemoryElement, MemoryForm, SelectOption};
pub use persistence::{
    FieldValue, FormRecord, PersistSession, clear_storage, deserialize, load, persist, save,
    serialize,
};
pub use platform::{Environment, MemoryEnvironment, MemoryStorage, Signal, StorageArea, StorageScope};
pub use settings::{PersistOptions, PersistSettings};

/// Crate-wide constants
pub mod consts {
    /// Prefix of every storage key
    pub const STORAGE_KEY_PREFIX: &str = "form#";
    /// Attribute marking a form for auto-persist; its value is settings JSON
    pub const SETTINGS_ATTRIBUTE: &str = "data-persist";
}
