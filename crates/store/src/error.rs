//! Store error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error("invalid account name: {0}")]
    InvalidName(String),

    #[error("adopted_by is required for claim")]
    MissingHolder,

    #[error("account '{account}' already adopted by {holder}")]
    LeaseHeld { account: String, holder: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("timestamp format error: {0}")]
    TimestampFormat(#[from] time::error::Format),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
