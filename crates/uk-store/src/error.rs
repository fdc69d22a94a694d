use uk_types::KeyId;

/// Errors from key/value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists for the key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The stored bytes could not be decoded into a record.
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: KeyId, reason: String },

    /// A record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
