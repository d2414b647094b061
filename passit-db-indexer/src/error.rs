//! Error types for index migrations

use thiserror::Error;

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Migration errors
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Store error outside of polling
    #[error("Store error: {0}")]
    Store(#[from] passit_db_core::StoreError),

    /// The schema update adding the index was rejected
    #[error("Failed to add index {index_name} to table {table_name}: {source}")]
    SchemaUpdate {
        table_name: String,
        index_name: String,
        #[source]
        source: passit_db_core::StoreError,
    },

    /// Resource properties are missing or malformed
    #[error("Invalid resource properties: {0}")]
    InvalidProperties(String),

    /// Persisted migration state cannot be resumed
    #[error("Invalid migration state: {0}")]
    InvalidState(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for IndexerError {
    fn from(e: serde_json::Error) -> Self {
        IndexerError::Serialization(e.to_string())
    }
}

impl IndexerError {
    pub fn invalid_properties(msg: impl Into<String>) -> Self {
        Self::InvalidProperties(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
