//! Error types for the AWS store backend

use passit_db_core::StoreError;
use thiserror::Error;

/// Errors from AWS backend setup and value conversion
#[derive(Debug, Error)]
pub enum AwsStoreError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing region configuration
    #[error("Missing AWS region configuration")]
    MissingRegion,

    /// A value could not be converted between JSON and DynamoDB attributes
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// DynamoDB SDK error
    #[cfg(feature = "dynamodb")]
    #[error("DynamoDB error: {0}")]
    DynamoDB(String),
}

impl AwsStoreError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    #[cfg(feature = "dynamodb")]
    pub fn dynamodb(msg: impl Into<String>) -> Self {
        Self::DynamoDB(msg.into())
    }
}

/// Result type for AWS backend operations
pub type Result<T> = std::result::Result<T, AwsStoreError>;

// Convert to passit_db_core errors
impl From<AwsStoreError> for StoreError {
    fn from(err: AwsStoreError) -> Self {
        match err {
            AwsStoreError::Conversion(msg) => StoreError::validation(msg),
            _ => StoreError::storage(err.to_string()),
        }
    }
}
