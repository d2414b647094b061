//! AWS store backend for Passit DB
//!
//! This crate provides the DynamoDB implementation of
//! [`passit_db_core::KeyValueStore`]:
//!
//! - **DynamoDB Store** (`dynamodb` feature): items, conditional and
//!   transactional writes, queries/scans with continuation keys, and
//!   secondary-index administration against Amazon DynamoDB (or LocalStack)
//!
//! ## Features
//!
//! - `dynamodb` (default): Enable the DynamoDB backend
//! - `aws-testcontainers`: Opt-in LocalStack integration tests
//!
//! ## Usage
//!
//! ```ignore
//! use passit_db_storage_aws::dynamodb::{DynamoDbConfig, DynamoDbStore};
//!
//! let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
//!
//! let store = DynamoDbStore::new(&sdk_config, DynamoDbConfig::default()).await?;
//! let table = store.describe_table("conversations").await?;
//! ```

pub mod error;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use error::{AwsStoreError, Result};

#[cfg(feature = "dynamodb")]
pub use dynamodb::{DynamoDbConfig, DynamoDbStore};

// Re-export the store trait for convenience
pub use passit_db_core::{KeyValueStore, StoreError};
