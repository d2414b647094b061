//! Table and secondary-index schema types
//!
//! ## Key schema
//!
//! ```text
//! TableDescriptor
//!   - table_name
//!   - partition_key: KeyAttribute (HASH)
//!   - sort_key: Option<KeyAttribute> (RANGE)
//!
//! IndexDescriptor (global secondary index, projection ALL)
//!   - index_name
//!   - partition_key: KeyAttribute (HASH)
//!   - sort_key: Option<KeyAttribute> (RANGE)
//!   - read_capacity / write_capacity (default 5/5)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provisioned read/write capacity used when an index descriptor omits it
pub const DEFAULT_INDEX_CAPACITY: i64 = 5;

/// Scalar type of a key attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// String
    S,
    /// Number
    N,
    /// Binary
    B,
}

impl ScalarType {
    /// Parse the store's single-letter type code
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::S),
            "N" => Some(Self::N),
            "B" => Some(Self::B),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed key attribute (also used as an attribute definition)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyAttribute {
    pub name: String,
    pub attr_type: ScalarType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }

    /// String-typed key attribute
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::S)
    }

    /// Number-typed key attribute
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::N)
    }
}

/// Primary key schema of an existing table. Immutable once the table exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

impl TableDescriptor {
    pub fn new(table_name: impl Into<String>, partition_key: KeyAttribute) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key,
            sort_key: None,
        }
    }

    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    /// Names of the primary key attributes, partition key first
    pub fn key_names(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.name.as_str()];
        if let Some(sk) = &self.sort_key {
            names.push(sk.name.as_str());
        }
        names
    }
}

/// A global secondary index to add to a table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub index_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub read_capacity: i64,
    pub write_capacity: i64,
}

impl IndexDescriptor {
    /// New index with default 5/5 provisioned capacity
    pub fn new(index_name: impl Into<String>, partition_key: KeyAttribute) -> Self {
        Self {
            index_name: index_name.into(),
            partition_key,
            sort_key: None,
            read_capacity: DEFAULT_INDEX_CAPACITY,
            write_capacity: DEFAULT_INDEX_CAPACITY,
        }
    }

    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    pub fn with_capacity(mut self, read: i64, write: i64) -> Self {
        self.read_capacity = read;
        self.write_capacity = write;
        self
    }

    /// Names of the index key attributes, partition key first
    pub fn key_names(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.name.as_str()];
        if let Some(sk) = &self.sort_key {
            names.push(sk.name.as_str());
        }
        names
    }
}

/// Lifecycle status of a table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Creating,
    Updating,
    Deleting,
    Active,
    /// Any status this layer does not model explicitly
    Other(String),
}

impl TableStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATING" => Self::Creating,
            "UPDATING" => Self::Updating,
            "DELETING" => Self::Deleting,
            "ACTIVE" => Self::Active,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        *self == Self::Active
    }
}

/// Lifecycle status of a secondary index
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexStatus {
    Creating,
    Updating,
    Deleting,
    Active,
    Other(String),
}

impl IndexStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATING" => Self::Creating,
            "UPDATING" => Self::Updating,
            "DELETING" => Self::Deleting,
            "ACTIVE" => Self::Active,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        *self == Self::Active
    }
}

/// Observed state of one secondary index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexDescription {
    pub index_name: String,
    pub status: IndexStatus,
    pub partition_key: Option<String>,
    pub sort_key: Option<String>,
    pub read_capacity: Option<i64>,
    pub write_capacity: Option<i64>,
}

/// Observed state of a table, as returned by `describe_table`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDescription {
    pub table_name: String,
    pub status: TableStatus,
    pub attribute_definitions: Vec<KeyAttribute>,
    /// `None` when the table has no secondary indexes at all
    pub indexes: Option<Vec<IndexDescription>>,
}

impl TableDescription {
    /// True when every secondary index is ACTIVE (vacuously true with none)
    pub fn indexes_active(&self) -> bool {
        self.indexes
            .as_ref()
            .map_or(true, |indexes| indexes.iter().all(|i| i.status.is_active()))
    }

    pub fn index(&self, name: &str) -> Option<&IndexDescription> {
        self.indexes
            .as_ref()
            .and_then(|indexes| indexes.iter().find(|i| i.index_name == name))
    }
}

/// Schema update adding exactly one global secondary index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTableRequest {
    pub table_name: String,
    /// Every attribute used by the new index's keys must be declared here
    pub attribute_definitions: Vec<KeyAttribute>,
    pub create_index: IndexDescriptor,
}
