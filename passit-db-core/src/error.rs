//! Error types for key-value store operations

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Why a single item of an atomic multi-item write was rejected
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellationReason {
    /// The item's condition held (or it had none); it was not the cause
    None,
    /// The item's condition expression evaluated to false
    ConditionalCheckFailed,
    /// Another transaction touched the same item
    TransactionConflict,
    /// Any other reason code reported by the store
    Other(String),
}

impl CancellationReason {
    /// Parse a store reason code (e.g. `"ConditionalCheckFailed"`)
    pub fn from_code(code: &str) -> Self {
        match code {
            "None" | "" => Self::None,
            "ConditionalCheckFailed" => Self::ConditionalCheckFailed,
            "TransactionConflict" => Self::TransactionConflict,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Errors that can occur in key-value store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditional put/update was rejected
    #[error("Conditional check failed on table {0}")]
    ConditionalCheckFailed(String),

    /// An atomic multi-item write was rejected as a whole
    #[error("Transaction canceled: {reasons:?}")]
    TransactionCanceled { reasons: Vec<CancellationReason> },

    /// Table does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table or index is being modified and cannot accept the request
    #[error("Resource in use: {0}")]
    ResourceInUse(String),

    /// Request rejected by the store as malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network, throttling or any other store-side failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a conditional check failure for `table`
    pub fn conditional_check_failed(table: impl Into<String>) -> Self {
        Self::ConditionalCheckFailed(table.into())
    }

    /// Create a table not found error
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound(table.into())
    }

    /// Create a resource in use error
    pub fn resource_in_use(msg: impl Into<String>) -> Self {
        Self::ResourceInUse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True when the write was rejected only because a condition did not hold.
    ///
    /// A canceled transaction counts when at least one item failed its
    /// condition and no item failed for another reason.
    pub fn is_conditional_failure(&self) -> bool {
        match self {
            Self::ConditionalCheckFailed(_) => true,
            Self::TransactionCanceled { reasons } => {
                reasons
                    .iter()
                    .any(|r| *r == CancellationReason::ConditionalCheckFailed)
                    && reasons.iter().all(|r| {
                        matches!(
                            r,
                            CancellationReason::None | CancellationReason::ConditionalCheckFailed
                        )
                    })
            }
            _ => false,
        }
    }
}
