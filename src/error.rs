//! Error type shared by every persistence operation

use crate::platform::StorageScope;

/// Errors raised while computing keys, touching storage or decoding records
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Neither a uuid nor a form identifier was available to build the key
    #[error("form has no identifier and no uuid was configured")]
    MissingIdentity,

    /// Stored value under `key` is not a valid record
    #[error("malformed record under {key}: {source}")]
    MalformedRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Settings JSON could not be parsed
    #[error("invalid persist settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    /// Record could not be encoded
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    /// No global `window` (not running on a browser main thread)
    #[error("no global window object")]
    NoWindow,

    /// The requested storage area does not exist in this environment
    #[error("{0} storage is unavailable")]
    StorageUnavailable(StorageScope),

    /// A storage call failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Writing `key` would exceed the storage quota
    #[error("quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// A lifecycle listener could not be attached
    #[error("failed to attach {signal} listener: {reason}")]
    Listener { signal: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, PersistError>;
