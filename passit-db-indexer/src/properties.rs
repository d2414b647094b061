//! Resource properties of an index migration

use crate::error::{IndexerError, Result};
use passit_db_core::{IndexDescriptor, KeyAttribute, ScalarType, TableDescriptor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Property bag sent by the host for one index resource
///
/// Hosts may stringify every property, so capacities accept numbers or
/// numeric strings. Unknown properties are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsiResourceProperties {
    pub table_name: String,
    pub primary_partition_key_name: String,
    pub primary_partition_key_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sort_key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sort_key_type: Option<String>,
    pub index_name: String,
    pub gsi_partition_key_name: String,
    pub gsi_partition_key_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsi_sort_key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsi_sort_key_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub gsi_read_capacity: Option<i64>,
    #[serde(
        default,
        deserialize_with = "de_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub gsi_write_capacity: Option<i64>,
}

fn de_capacity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("capacity {} is not an integer", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("capacity {:?} is not an integer", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "capacity must be a number, got {}",
            other
        ))),
    }
}

fn key_attribute(what: &str, name: &str, attr_type: &str) -> Result<KeyAttribute> {
    if name.trim().is_empty() {
        return Err(IndexerError::invalid_properties(format!("{} name is empty", what)));
    }
    let attr_type = ScalarType::parse(attr_type).ok_or_else(|| {
        IndexerError::invalid_properties(format!(
            "{} type {:?} is not one of S, N, B",
            what, attr_type
        ))
    })?;
    Ok(KeyAttribute::new(name, attr_type))
}

fn optional_key(
    what: &str,
    name: &Option<String>,
    attr_type: &Option<String>,
) -> Result<Option<KeyAttribute>> {
    match (name, attr_type) {
        (Some(name), Some(attr_type)) => key_attribute(what, name, attr_type).map(Some),
        (None, None) => Ok(None),
        _ => Err(IndexerError::invalid_properties(format!(
            "{} needs both a name and a type",
            what
        ))),
    }
}

fn capacity(what: &str, value: Option<i64>) -> Result<Option<i64>> {
    match value {
        Some(v) if v < 1 => Err(IndexerError::invalid_properties(format!(
            "{} capacity must be positive, got {}",
            what, v
        ))),
        other => Ok(other),
    }
}

impl GsiResourceProperties {
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| IndexerError::invalid_properties(e.to_string()))
    }

    /// Validate and convert into the table and index to migrate
    pub fn to_descriptors(&self) -> Result<(TableDescriptor, IndexDescriptor)> {
        if self.table_name.trim().is_empty() {
            return Err(IndexerError::invalid_properties("tableName is empty"));
        }
        if self.index_name.trim().is_empty() {
            return Err(IndexerError::invalid_properties("indexName is empty"));
        }

        let mut table = TableDescriptor::new(
            &self.table_name,
            key_attribute(
                "primary partition key",
                &self.primary_partition_key_name,
                &self.primary_partition_key_type,
            )?,
        );
        if let Some(sort) = optional_key(
            "primary sort key",
            &self.primary_sort_key_name,
            &self.primary_sort_key_type,
        )? {
            table = table.with_sort_key(sort);
        }

        let mut index = IndexDescriptor::new(
            &self.index_name,
            key_attribute(
                "index partition key",
                &self.gsi_partition_key_name,
                &self.gsi_partition_key_type,
            )?,
        );
        if let Some(sort) =
            optional_key("index sort key", &self.gsi_sort_key_name, &self.gsi_sort_key_type)?
        {
            index = index.with_sort_key(sort);
        }
        let read = capacity("read", self.gsi_read_capacity)?.unwrap_or(index.read_capacity);
        let write = capacity("write", self.gsi_write_capacity)?.unwrap_or(index.write_capacity);
        index = index.with_capacity(read, write);
        Ok((table, index))
    }
}
