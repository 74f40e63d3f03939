//! Error types for slot binding and synchronization.

use thiserror::Error;

/// Errors that can occur while binding or synchronizing persistent values.
#[derive(Error, Debug)]
pub enum Error {
    /// Stored text could not be deserialized into the slot's value type.
    #[error("Parse error for key '{key}': {source}")]
    Parse {
        /// Key whose stored text was rejected.
        key: String,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized to its storage text.
    #[error("Serialize error for key '{key}': {source}")]
    Serialize {
        /// Key the value was being written under.
        key: String,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The durable store could not be opened or probed as writable.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A store read or write failed.
    #[error("Store error: {0}")]
    Store(String),

    /// A change notification subscription could not be established.
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// IO error during store operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::Parse`] from a key and a serde error.
    pub fn parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Parse {
            key: key.into(),
            source,
        }
    }

    /// Build a [`Error::Serialize`] from a key and a serde error.
    pub fn serialize(key: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Serialize {
            key: key.into(),
            source,
        }
    }
}
