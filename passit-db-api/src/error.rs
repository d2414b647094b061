//! Error types for the Passit DB API

use thiserror::Error;

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] passit_db_core::StoreError),

    /// Paginated read error
    #[error("Query error: {0}")]
    Query(#[from] passit_db_query::QueryError),

    /// Write error
    #[error("Transaction error: {0}")]
    Transact(#[from] passit_db_transact::TransactError),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored item could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ApiError::Config(msg.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        use passit_db_query::QueryError;
        use passit_db_transact::TransactError;
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::Query(QueryError::InvalidCursor(_) | QueryError::InvalidLimit(_)) => 400,
            ApiError::Transact(e) => match e {
                TransactError::Validation(_) | TransactError::SameParticipant(_) => 400,
                TransactError::NotOwner { .. } => 403,
                TransactError::NotFound(_) => 404,
                _ => 500,
            },
            ApiError::Store(passit_db_core::StoreError::TableNotFound(_)) => 404,
            // Internal/infrastructure errors
            _ => 500,
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
