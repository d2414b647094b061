//! Error types for paginated reads

use thiserror::Error;

/// Result type for pagination operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Pagination errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Error from the underlying store, surfaced without retry
    #[error("Read failed: {0}")]
    Store(#[from] passit_db_core::StoreError),

    /// Cursor token could not be decoded
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// A limit of zero was requested
    #[error("Invalid limit: {0} (must be at least 1)")]
    InvalidLimit(u32),

    /// An item did not match the requested type
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    pub fn invalid_cursor(msg: impl Into<String>) -> Self {
        Self::InvalidCursor(msg.into())
    }
}
