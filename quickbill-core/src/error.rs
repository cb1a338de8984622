use thiserror::Error;

/// Errors raised when writing to a key-value store.
///
/// Reads never fail: missing or malformed data is treated as empty by
/// [`crate::store::Repository`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error on key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn io(key: &str, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}
