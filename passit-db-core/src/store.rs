//! The `KeyValueStore` trait and its request/response types

use crate::error::Result;
use crate::expr::{Condition, FilterCondition, KeyCondition};
use crate::item::{Item, Key};
use crate::schema::{TableDescription, UpdateTableRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Options shared by `query` and `scan`
#[derive(Clone, Debug, PartialEq)]
pub struct ReadOptions {
    /// Read a secondary index instead of the base table
    pub index_name: Option<String>,
    /// Filters applied after evaluation (they do not reduce the limit)
    pub filter: Vec<FilterCondition>,
    /// Resume after this key
    pub exclusive_start_key: Option<Key>,
    /// Maximum number of items to evaluate
    pub limit: Option<u32>,
    /// Ascending sort-key order when true (queries only)
    pub scan_forward: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            index_name: None,
            filter: Vec::new(),
            exclusive_start_key: None,
            limit: None,
            scan_forward: true,
        }
    }
}

/// One page of a read
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadOutput {
    pub items: Vec<Item>,
    /// Present when the read stopped early; may point past the last item
    pub last_evaluated_key: Option<Key>,
}

/// A whole-item write, optionally guarded
#[derive(Clone, Debug, PartialEq)]
pub struct PutRequest {
    pub table_name: String,
    pub item: Item,
    pub condition: Option<Condition>,
}

impl PutRequest {
    pub fn new(table_name: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            condition: None,
        }
    }

    /// Only write if nothing is stored at the item's key
    pub fn if_not_exists(mut self, key_attr: impl Into<String>) -> Self {
        self.condition = Some(Condition::AttributeNotExists(key_attr.into()));
        self
    }
}

/// Set attributes on an existing item, optionally guarded
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateRequest {
    pub table_name: String,
    pub key: Key,
    pub set: Vec<(String, Value)>,
    pub condition: Option<Condition>,
}

/// One member of an atomic multi-item write
#[derive(Clone, Debug, PartialEq)]
pub enum TransactWriteItem {
    Put(PutRequest),
}

impl TransactWriteItem {
    pub fn table_name(&self) -> &str {
        match self {
            Self::Put(put) => &put.table_name,
        }
    }
}

/// An eventually-convergent key-value store with single-partition atomicity,
/// multi-item conditional transactions and continuation-key pagination.
#[async_trait]
pub trait KeyValueStore: Debug + Send + Sync {
    /// Describe a table, including the status of its secondary indexes
    async fn describe_table(&self, table_name: &str) -> Result<TableDescription>;

    /// Submit a schema update adding one secondary index.
    ///
    /// Returns once the request is accepted; the index becomes ACTIVE later.
    async fn update_table(&self, request: UpdateTableRequest) -> Result<()>;

    /// Strongly consistent point read
    async fn get_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>>;

    async fn put_item(&self, request: PutRequest) -> Result<()>;

    /// Apply an update and return the item as stored afterwards
    async fn update_item(&self, request: UpdateRequest) -> Result<Item>;

    /// Apply all writes or none of them
    async fn transact_write(&self, items: Vec<TransactWriteItem>) -> Result<()>;

    /// Key-conditioned read
    async fn query(
        &self,
        table_name: &str,
        condition: &KeyCondition,
        options: &ReadOptions,
    ) -> Result<ReadOutput>;

    /// Unconditioned read over the whole table or index
    async fn scan(&self, table_name: &str, options: &ReadOptions) -> Result<ReadOutput>;
}
