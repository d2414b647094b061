//! Transaction error types

use thiserror::Error;

/// Result type for write operations
pub type Result<T> = std::result::Result<T, TransactError>;

/// Write errors
#[derive(Error, Debug)]
pub enum TransactError {
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] passit_db_core::StoreError),

    /// Read error while resolving an existing conversation
    #[error("Query error: {0}")]
    Query(#[from] passit_db_query::QueryError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Both participants of a conversation are the same user
    #[error("Cannot create a conversation of {0} with themselves")]
    SameParticipant(String),

    /// A conditional failure could not be explained by an existing pair
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The listing exists but belongs to someone else
    #[error("Listing {listing_id} is not owned by {owner}")]
    NotOwner { listing_id: String, owner: String },

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl TransactError {
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
