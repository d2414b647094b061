//! Core abstractions for Passit DB
//!
//! This crate defines the contract every data-consistency protocol in the
//! workspace is written against:
//!
//! - [`KeyValueStore`]: an eventually-convergent key-value store offering
//!   point reads and writes, conditional writes, atomic multi-item writes,
//!   key-conditioned queries, scans and secondary-index administration
//! - Schema types ([`TableDescriptor`], [`IndexDescriptor`], [`TableDescription`])
//! - Typed conditions ([`KeyCondition`], [`FilterCondition`], [`Condition`])
//!
//! # Implementations
//!
//! - [`MemoryStore`]: In-memory implementation for testing
//! - `DynamoDbStore` in `passit-db-storage-aws`

mod error;
pub mod expr;
pub mod item;
pub mod memory;
pub mod schema;
pub mod store;

pub use error::{CancellationReason, Result, StoreError};
pub use expr::{Condition, FilterCondition, KeyCondition, SortKeyCondition};
pub use item::{Item, Key};
pub use memory::{CallCounts, MemoryStore};
pub use schema::{
    IndexDescription, IndexDescriptor, IndexStatus, KeyAttribute, ScalarType, TableDescription,
    TableDescriptor, TableStatus, UpdateTableRequest, DEFAULT_INDEX_CAPACITY,
};
pub use store::{
    KeyValueStore, PutRequest, ReadOptions, ReadOutput, TransactWriteItem, UpdateRequest,
};
