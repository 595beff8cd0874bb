use std::path::PathBuf;

use folio_types::ProjectId;

/// Errors from blob and collection operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The inline image payload is malformed or empty.
    #[error("invalid image payload: {0}")]
    Payload(String),

    /// The decoded image exceeds the configured limit.
    #[error("image payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// A record with this id is already in the collection.
    #[error("duplicate project id: {0}")]
    DuplicateId(ProjectId),

    /// The collection file exists but does not parse.
    #[error("corrupt collection file {}: {reason}", .path.display())]
    CorruptCollection { path: PathBuf, reason: String },

    /// Requested blob does not exist.
    #[error("blob not found: {0}")]
    BlobNotFound(String),

    /// Serialization failure while encoding the collection.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
