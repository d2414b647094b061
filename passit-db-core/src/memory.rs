//! In-memory key-value store for testing
//!
//! Stores all tables behind an `Arc<RwLock>` so clones share state, which
//! makes it usable from concurrent tasks on a multi-threaded runtime.
//!
//! Besides item storage it models the behaviors the consistency protocols
//! compensate for:
//!
//! - tables and secondary indexes become ACTIVE only after a configurable
//!   number of `describe_table` calls, and describes can be made to fail
//! - `limit` bounds evaluated items and a continuation key is returned
//!   whenever the limit is hit, even if nothing follows
//! - an optional page size cuts reads short the way a response-size cap does
//! - transactions check every condition before applying any write

use crate::error::{CancellationReason, Result, StoreError};
use crate::expr::{FilterCondition, KeyCondition};
use crate::item::{compare_values, matches_key, project_key, Item, Key};
use crate::schema::{
    IndexDescription, IndexDescriptor, IndexStatus, KeyAttribute, TableDescription,
    TableDescriptor, TableStatus, UpdateTableRequest,
};
use crate::store::{
    KeyValueStore, PutRequest, ReadOptions, ReadOutput, TransactWriteItem, UpdateRequest,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Maximum number of writes in one transaction
pub const MAX_TRANSACT_ITEMS: usize = 100;

/// Snapshot of how often each operation was called
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub describe_table: u64,
    pub update_table: u64,
    pub reads: u64,
    pub writes: u64,
}

#[derive(Default)]
struct Counters {
    describe_table: AtomicU64,
    update_table: AtomicU64,
    reads: AtomicU64,
    writes: AtomicU64,
}

struct MemoryIndex {
    descriptor: IndexDescriptor,
    status: IndexStatus,
    describes_until_active: u32,
}

struct MemoryTable {
    descriptor: TableDescriptor,
    status: TableStatus,
    describes_until_active: u32,
    attribute_definitions: Vec<KeyAttribute>,
    indexes: Vec<MemoryIndex>,
    /// Describes a newly added index needs before it reports ACTIVE
    index_latency: u32,
    /// Items in insertion order (scan order)
    items: Vec<Item>,
}

impl MemoryTable {
    fn new(descriptor: TableDescriptor, describes_until_active: u32) -> Self {
        let mut attribute_definitions = vec![descriptor.partition_key.clone()];
        if let Some(sk) = &descriptor.sort_key {
            attribute_definitions.push(sk.clone());
        }
        Self {
            status: if describes_until_active == 0 {
                TableStatus::Active
            } else {
                TableStatus::Creating
            },
            descriptor,
            describes_until_active,
            attribute_definitions,
            indexes: Vec::new(),
            index_latency: 0,
            items: Vec::new(),
        }
    }

    fn primary_key(&self, item: &Item) -> Result<Key> {
        project_key(item, &self.descriptor.key_names()).ok_or_else(|| {
            StoreError::validation(format!(
                "item is missing a key attribute of table {}",
                self.descriptor.table_name
            ))
        })
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.items.iter().position(|i| matches_key(i, key))
    }

    fn tick(&mut self) {
        if self.describes_until_active > 0 {
            self.describes_until_active -= 1;
            if self.describes_until_active == 0 {
                self.status = TableStatus::Active;
            }
        }
        for index in &mut self.indexes {
            if index.describes_until_active > 0 {
                index.describes_until_active -= 1;
                if index.describes_until_active == 0 {
                    index.status = IndexStatus::Active;
                }
            }
        }
    }

    fn describe(&self) -> TableDescription {
        let indexes = if self.indexes.is_empty() {
            None
        } else {
            Some(
                self.indexes
                    .iter()
                    .map(|i| IndexDescription {
                        index_name: i.descriptor.index_name.clone(),
                        status: i.status.clone(),
                        partition_key: Some(i.descriptor.partition_key.name.clone()),
                        sort_key: i.descriptor.sort_key.as_ref().map(|k| k.name.clone()),
                        read_capacity: Some(i.descriptor.read_capacity),
                        write_capacity: Some(i.descriptor.write_capacity),
                    })
                    .collect(),
            )
        };
        TableDescription {
            table_name: self.descriptor.table_name.clone(),
            status: self.status.clone(),
            attribute_definitions: self.attribute_definitions.clone(),
            indexes,
        }
    }
}

#[derive(Default)]
struct State {
    tables: HashMap<String, MemoryTable>,
    failing_describes: u32,
    page_size: Option<u32>,
}

/// In-memory `KeyValueStore` for tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
    counters: Arc<Counters>,
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemoryStore")
            .field("table_count", &state.tables.len())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an ACTIVE table
    pub fn create_table(&self, descriptor: TableDescriptor) {
        self.create_table_pending(descriptor, 0);
    }

    /// Create a table in CREATING state that turns ACTIVE on the
    /// `describes_until_active`-th describe call
    pub fn create_table_pending(&self, descriptor: TableDescriptor, describes_until_active: u32) {
        let name = descriptor.table_name.clone();
        self.state
            .write()
            .tables
            .insert(name, MemoryTable::new(descriptor, describes_until_active));
    }

    /// Attach an already-ACTIVE index (test setup, bypasses `update_table`)
    pub fn create_index(&self, table_name: &str, descriptor: IndexDescriptor) -> Result<()> {
        let mut state = self.state.write();
        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::table_not_found(table_name))?;
        for key in [Some(&descriptor.partition_key), descriptor.sort_key.as_ref()]
            .into_iter()
            .flatten()
        {
            if !table.attribute_definitions.iter().any(|d| d.name == key.name) {
                table.attribute_definitions.push(key.clone());
            }
        }
        table.indexes.push(MemoryIndex {
            descriptor,
            status: IndexStatus::Active,
            describes_until_active: 0,
        });
        Ok(())
    }

    /// Indexes added through `update_table` report ACTIVE on the
    /// `describes`-th describe call after submission
    pub fn set_index_latency(&self, table_name: &str, describes: u32) -> Result<()> {
        let mut state = self.state.write();
        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::table_not_found(table_name))?;
        table.index_latency = describes;
        Ok(())
    }

    /// Make the next `count` describe calls fail with a storage error
    pub fn fail_next_describes(&self, count: u32) {
        self.state.write().failing_describes = count;
    }

    /// Cap the number of items evaluated by a single read
    pub fn set_page_size(&self, page_size: Option<u32>) {
        self.state.write().page_size = page_size;
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            describe_table: self.counters.describe_table.load(AtomicOrdering::SeqCst),
            update_table: self.counters.update_table.load(AtomicOrdering::SeqCst),
            reads: self.counters.reads.load(AtomicOrdering::SeqCst),
            writes: self.counters.writes.load(AtomicOrdering::SeqCst),
        }
    }

    /// All items of a table in insertion order
    pub fn items(&self, table_name: &str) -> Vec<Item> {
        self.state
            .read()
            .tables
            .get(table_name)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }

    fn read(
        &self,
        table_name: &str,
        condition: Option<&KeyCondition>,
        options: &ReadOptions,
    ) -> Result<ReadOutput> {
        self.counters.reads.fetch_add(1, AtomicOrdering::SeqCst);
        if options.limit == Some(0) {
            return Err(StoreError::validation("limit must be at least 1"));
        }

        let state = self.state.read();
        let table = state
            .tables
            .get(table_name)
            .ok_or_else(|| StoreError::table_not_found(table_name))?;

        // Key attributes of the source: index keys first, then table keys
        let (partition_name, sort_name, mut key_names) = match &options.index_name {
            Some(index_name) => {
                let index = table
                    .indexes
                    .iter()
                    .find(|i| &i.descriptor.index_name == index_name)
                    .ok_or_else(|| {
                        StoreError::validation(format!(
                            "table {} has no index {}",
                            table_name, index_name
                        ))
                    })?;
                if !index.status.is_active() {
                    return Err(StoreError::validation(format!(
                        "cannot read from backfilling index {}",
                        index_name
                    )));
                }
                (
                    index.descriptor.partition_key.name.clone(),
                    index.descriptor.sort_key.as_ref().map(|k| k.name.clone()),
                    index
                        .descriptor
                        .key_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect::<Vec<_>>(),
                )
            }
            None => (
                table.descriptor.partition_key.name.clone(),
                table.descriptor.sort_key.as_ref().map(|k| k.name.clone()),
                Vec::new(),
            ),
        };
        for name in table.descriptor.key_names() {
            if !key_names.iter().any(|n| n == name) {
                key_names.push(name.to_string());
            }
        }
        let key_names: Vec<&str> = key_names.iter().map(String::as_str).collect();

        if let Some(cond) = condition {
            if cond.partition_attr != partition_name {
                return Err(StoreError::validation(format!(
                    "key condition must target partition key {}",
                    partition_name
                )));
            }
            if let (Some(sort), Some(expected)) = (&cond.sort, &sort_name) {
                if sort.attribute() != expected {
                    return Err(StoreError::validation(format!(
                        "key condition must target sort key {}",
                        expected
                    )));
                }
            }
        }

        // Sparse source: only items carrying every source key attribute
        let mut candidates: Vec<&Item> = table
            .items
            .iter()
            .filter(|i| key_names.iter().all(|n| i.contains_key(*n)))
            .filter(|i| condition.map_or(true, |c| c.matches(i)))
            .collect();

        if condition.is_some() {
            if let Some(sort_name) = &sort_name {
                candidates.sort_by(|a, b| {
                    compare_values(&a[sort_name.as_str()], &b[sort_name.as_str()])
                        .unwrap_or(Ordering::Equal)
                });
            }
            if !options.scan_forward {
                candidates.reverse();
            }
        }

        let start = match &options.exclusive_start_key {
            Some(start_key) => {
                candidates
                    .iter()
                    .position(|i| matches_key(i, start_key))
                    .ok_or_else(|| {
                        StoreError::validation("exclusive start key does not match the read")
                    })?
                    + 1
            }
            None => 0,
        };

        let budget = match (options.limit, state.page_size) {
            (Some(l), Some(p)) => Some(l.min(p)),
            (l, p) => l.or(p),
        };

        let mut output = ReadOutput::default();
        let mut evaluated = 0u32;
        for item in &candidates[start.min(candidates.len())..] {
            evaluated += 1;
            if FilterCondition::all_match(&options.filter, item) {
                output.items.push((*item).clone());
            }
            if budget == Some(evaluated) {
                output.last_evaluated_key = project_key(item, &key_names);
                break;
            }
        }
        Ok(output)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn describe_table(&self, table_name: &str) -> Result<TableDescription> {
        self.counters
            .describe_table
            .fetch_add(1, AtomicOrdering::SeqCst);
        let mut state = self.state.write();
        if state.failing_describes > 0 {
            state.failing_describes -= 1;
            return Err(StoreError::storage("describe_table unavailable"));
        }
        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::table_not_found(table_name))?;
        table.tick();
        Ok(table.describe())
    }

    async fn update_table(&self, request: UpdateTableRequest) -> Result<()> {
        self.counters
            .update_table
            .fetch_add(1, AtomicOrdering::SeqCst);
        let mut state = self.state.write();
        let table = state
            .tables
            .get_mut(&request.table_name)
            .ok_or_else(|| StoreError::table_not_found(&request.table_name))?;

        if !table.status.is_active() || table.indexes.iter().any(|i| !i.status.is_active()) {
            return Err(StoreError::resource_in_use(format!(
                "table {} is being updated",
                request.table_name
            )));
        }
        let index = request.create_index;
        tracing::debug!(
            table = %request.table_name,
            index = %index.index_name,
            "index creation requested"
        );
        if table
            .indexes
            .iter()
            .any(|i| i.descriptor.index_name == index.index_name)
        {
            return Err(StoreError::validation(format!(
                "index {} already exists",
                index.index_name
            )));
        }
        for name in index.key_names() {
            if !request.attribute_definitions.iter().any(|d| d.name == name) {
                return Err(StoreError::validation(format!(
                    "attribute {} used by index {} is not defined",
                    name, index.index_name
                )));
            }
        }
        for def in &request.attribute_definitions {
            match table
                .attribute_definitions
                .iter()
                .find(|d| d.name == def.name)
            {
                Some(existing) if existing.attr_type != def.attr_type => {
                    return Err(StoreError::validation(format!(
                        "attribute {} redefined as {}",
                        def.name, def.attr_type
                    )));
                }
                Some(_) => {}
                None => table.attribute_definitions.push(def.clone()),
            }
        }

        let latency = table.index_latency;
        table.indexes.push(MemoryIndex {
            descriptor: index,
            status: if latency == 0 {
                IndexStatus::Active
            } else {
                IndexStatus::Creating
            },
            describes_until_active: latency,
        });
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>> {
        self.counters.reads.fetch_add(1, AtomicOrdering::SeqCst);
        let state = self.state.read();
        let table = state
            .tables
            .get(table_name)
            .ok_or_else(|| StoreError::table_not_found(table_name))?;
        Ok(table.position(key).map(|p| table.items[p].clone()))
    }

    async fn put_item(&self, request: PutRequest) -> Result<()> {
        self.counters.writes.fetch_add(1, AtomicOrdering::SeqCst);
        let mut state = self.state.write();
        let table = state
            .tables
            .get_mut(&request.table_name)
            .ok_or_else(|| StoreError::table_not_found(&request.table_name))?;
        let key = table.primary_key(&request.item)?;
        let position = table.position(&key);
        if let Some(cond) = &request.condition {
            if !cond.holds(position.map(|p| &table.items[p])) {
                return Err(StoreError::conditional_check_failed(&request.table_name));
            }
        }
        match position {
            Some(p) => table.items[p] = request.item,
            None => table.items.push(request.item),
        }
        Ok(())
    }

    async fn update_item(&self, request: UpdateRequest) -> Result<Item> {
        self.counters.writes.fetch_add(1, AtomicOrdering::SeqCst);
        let mut state = self.state.write();
        let table = state
            .tables
            .get_mut(&request.table_name)
            .ok_or_else(|| StoreError::table_not_found(&request.table_name))?;
        let key = table.primary_key(&request.key)?;
        let key_names = table.descriptor.key_names();
        if let Some((name, _)) = request
            .set
            .iter()
            .find(|(name, _)| key_names.contains(&name.as_str()))
        {
            return Err(StoreError::validation(format!(
                "cannot update key attribute {}",
                name
            )));
        }
        let position = table.position(&key);
        if let Some(cond) = &request.condition {
            if !cond.holds(position.map(|p| &table.items[p])) {
                return Err(StoreError::conditional_check_failed(&request.table_name));
            }
        }
        let index = match position {
            Some(p) => p,
            None => {
                table.items.push(key);
                table.items.len() - 1
            }
        };
        let item = &mut table.items[index];
        for (name, value) in request.set {
            item.insert(name, value);
        }
        Ok(item.clone())
    }

    async fn transact_write(&self, items: Vec<TransactWriteItem>) -> Result<()> {
        self.counters.writes.fetch_add(1, AtomicOrdering::SeqCst);
        if items.is_empty() || items.len() > MAX_TRANSACT_ITEMS {
            return Err(StoreError::validation(format!(
                "transaction must contain 1..={} items",
                MAX_TRANSACT_ITEMS
            )));
        }

        let mut state = self.state.write();

        // Validate and evaluate every condition before touching anything
        let mut seen = HashSet::new();
        let mut reasons = Vec::with_capacity(items.len());
        for TransactWriteItem::Put(put) in &items {
            let table = state
                .tables
                .get(&put.table_name)
                .ok_or_else(|| StoreError::table_not_found(&put.table_name))?;
            let key = table.primary_key(&put.item)?;
            if !seen.insert((put.table_name.clone(), serde_json::to_string(&key)?)) {
                return Err(StoreError::validation(
                    "transaction contains multiple operations on one item",
                ));
            }
            let existing = table.position(&key).map(|p| &table.items[p]);
            let ok = put.condition.as_ref().map_or(true, |c| c.holds(existing));
            reasons.push(if ok {
                CancellationReason::None
            } else {
                CancellationReason::ConditionalCheckFailed
            });
        }
        if reasons.iter().any(|r| *r != CancellationReason::None) {
            tracing::debug!(?reasons, "transaction canceled");
            return Err(StoreError::TransactionCanceled { reasons });
        }

        for TransactWriteItem::Put(put) in items {
            if let Some(table) = state.tables.get_mut(&put.table_name) {
                let key = table.primary_key(&put.item)?;
                match table.position(&key) {
                    Some(p) => table.items[p] = put.item,
                    None => table.items.push(put.item),
                }
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        table_name: &str,
        condition: &KeyCondition,
        options: &ReadOptions,
    ) -> Result<ReadOutput> {
        self.read(table_name, Some(condition), options)
    }

    async fn scan(&self, table_name: &str, options: &ReadOptions) -> Result<ReadOutput> {
        self.read(table_name, None, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Condition;
    use crate::item::key1;
    use crate::schema::ScalarType;
    use serde_json::json;

    fn item(v: serde_json::Value) -> Item {
        v.as_object().cloned().unwrap()
    }

    fn store_with_table() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_table(TableDescriptor::new("T", KeyAttribute::string("id")));
        store
    }

    #[tokio::test]
    async fn test_table_activates_after_describes() {
        let store = MemoryStore::new();
        store.create_table_pending(TableDescriptor::new("T", KeyAttribute::string("id")), 3);

        let mut statuses = Vec::new();
        for _ in 0..3 {
            statuses.push(store.describe_table("T").await.unwrap().status);
        }
        assert_eq!(
            statuses,
            vec![
                TableStatus::Creating,
                TableStatus::Creating,
                TableStatus::Active
            ]
        );
        assert_eq!(store.calls().describe_table, 3);
    }

    #[tokio::test]
    async fn test_failing_describes() {
        let store = store_with_table();
        store.fail_next_describes(1);
        assert!(store.describe_table("T").await.is_err());
        assert!(store.describe_table("T").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_table_adds_creating_index() {
        let store = store_with_table();
        store.set_index_latency("T", 2).unwrap();
        let request = UpdateTableRequest {
            table_name: "T".to_string(),
            attribute_definitions: vec![
                KeyAttribute::string("id"),
                KeyAttribute::string("ownerId"),
            ],
            create_index: IndexDescriptor::new("by-owner", KeyAttribute::string("ownerId")),
        };
        store.update_table(request.clone()).await.unwrap();

        let desc = store.describe_table("T").await.unwrap();
        assert_eq!(desc.index("by-owner").unwrap().status, IndexStatus::Creating);

        // Second update while the first index backfills is rejected
        let err = store.update_table(request.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::ResourceInUse(_)));

        let desc = store.describe_table("T").await.unwrap();
        assert!(desc.indexes_active());

        // Duplicate index name is rejected, not duplicated
        let err = store.update_table(request).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_table_requires_definitions() {
        let store = store_with_table();
        let err = store
            .update_table(UpdateTableRequest {
                table_name: "T".to_string(),
                attribute_definitions: vec![KeyAttribute::string("id")],
                create_index: IndexDescriptor::new(
                    "by-owner",
                    KeyAttribute::new("ownerId", ScalarType::S),
                ),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_conditional_put() {
        let store = store_with_table();
        let put = PutRequest::new("T", item(json!({"id": "a", "v": 1}))).if_not_exists("id");
        store.put_item(put.clone()).await.unwrap();
        let err = store.put_item(put).await.unwrap_err();
        assert!(err.is_conditional_failure());
        assert_eq!(
            store.get_item("T", &key1("id", "a")).await.unwrap(),
            Some(item(json!({"id": "a", "v": 1})))
        );
    }

    #[tokio::test]
    async fn test_update_item_guarded() {
        let store = store_with_table();
        store
            .put_item(PutRequest::new("T", item(json!({"id": "a", "owner": "o1"}))))
            .await
            .unwrap();

        let request = |owner: &str| UpdateRequest {
            table_name: "T".to_string(),
            key: key1("id", "a"),
            set: vec![("title".to_string(), json!("new"))],
            condition: Some(Condition::AttributeEquals("owner".into(), json!(owner))),
        };
        let err = store.update_item(request("o2")).await.unwrap_err();
        assert!(err.is_conditional_failure());

        let updated = store.update_item(request("o1")).await.unwrap();
        assert_eq!(updated["title"], json!("new"));
    }

    #[tokio::test]
    async fn test_transaction_is_all_or_nothing() {
        let store = store_with_table();
        store
            .put_item(PutRequest::new("T", item(json!({"id": "b"}))))
            .await
            .unwrap();

        let err = store
            .transact_write(vec![
                TransactWriteItem::Put(
                    PutRequest::new("T", item(json!({"id": "a"}))).if_not_exists("id"),
                ),
                TransactWriteItem::Put(
                    PutRequest::new("T", item(json!({"id": "b"}))).if_not_exists("id"),
                ),
            ])
            .await
            .unwrap_err();
        match &err {
            StoreError::TransactionCanceled { reasons } => assert_eq!(
                reasons,
                &vec![
                    CancellationReason::None,
                    CancellationReason::ConditionalCheckFailed
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.get_item("T", &key1("id", "a")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_limit_returns_key_even_at_end() {
        let store = store_with_table();
        for id in ["a", "b"] {
            store
                .put_item(PutRequest::new("T", item(json!({"id": id}))))
                .await
                .unwrap();
        }
        let options = ReadOptions {
            limit: Some(2),
            ..Default::default()
        };
        let out = store.scan("T", &options).await.unwrap();
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.last_evaluated_key, Some(key1("id", "b")));

        let options = ReadOptions {
            exclusive_start_key: out.last_evaluated_key,
            ..Default::default()
        };
        let out = store.scan("T", &options).await.unwrap();
        assert!(out.items.is_empty());
        assert!(out.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_query_index_descending() {
        let store = store_with_table();
        store
            .create_index(
                "T",
                IndexDescriptor::new("user-index", KeyAttribute::string("userId"))
                    .with_sort_key(KeyAttribute::string("createdAt")),
            )
            .unwrap();
        for (id, user, at) in [
            ("1", "u1", "2021-01-01"),
            ("2", "u1", "2021-01-03"),
            ("3", "u2", "2021-01-02"),
            ("4", "u1", "2021-01-02"),
        ] {
            store
                .put_item(PutRequest::new(
                    "T",
                    item(json!({"id": id, "userId": user, "createdAt": at})),
                ))
                .await
                .unwrap();
        }
        let options = ReadOptions {
            index_name: Some("user-index".to_string()),
            scan_forward: false,
            limit: Some(2),
            ..Default::default()
        };
        let out = store
            .query("T", &KeyCondition::partition("userId", "u1"), &options)
            .await
            .unwrap();
        let ids: Vec<_> = out.items.iter().map(|i| i["id"].clone()).collect();
        assert_eq!(ids, vec![json!("2"), json!("4")]);
        let lek = out.last_evaluated_key.unwrap();
        assert_eq!(lek.len(), 3);
        assert_eq!(lek["id"], json!("4"));
    }
}
