use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("project id must not be empty")]
    EmptyId,

    #[error("invalid project id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },
}
