//! Form state persistence
//!
//! Features:
//! - Flat JSON record (field name → values)
//! - Allow/deny lists and element predicates
//! - Per-field restore overrides
//! - Auto-persist sessions driven by lifecycle signals

pub mod deserialize;
pub mod filter;
pub mod handlers;
pub mod lifecycle;
pub mod record;
pub mod serialize;

pub use deserialize::deserialize;
pub use filter::{ElementPredicate, is_element_filtered, is_name_filtered};
pub use handlers::{ValueFunction, ValueFunctions, apply_special_handlers};
pub use lifecycle::{PersistSession, clear_storage, load, persist, save};
pub use record::{FieldValue, FormRecord};
pub use serialize::serialize;
