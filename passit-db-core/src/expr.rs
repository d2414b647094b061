//! Typed key, filter and write conditions
//!
//! Conditions are built from values instead of expression strings. Store
//! backends render them into their own expression syntax; the in-memory
//! store evaluates them directly with the `matches` methods here.

use crate::item::{compare_values, Item};
use serde_json::Value;
use std::cmp::Ordering;

/// Condition on the sort key of a query
#[derive(Clone, Debug, PartialEq)]
pub enum SortKeyCondition {
    Eq(String, Value),
    Lt(String, Value),
    Le(String, Value),
    Gt(String, Value),
    Ge(String, Value),
    Between(String, Value, Value),
    BeginsWith(String, String),
}

impl SortKeyCondition {
    pub fn attribute(&self) -> &str {
        match self {
            Self::Eq(a, _)
            | Self::Lt(a, _)
            | Self::Le(a, _)
            | Self::Gt(a, _)
            | Self::Ge(a, _)
            | Self::Between(a, _, _)
            | Self::BeginsWith(a, _) => a,
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        let Some(actual) = item.get(self.attribute()) else {
            return false;
        };
        let cmp = |v: &Value| compare_values(actual, v);
        match self {
            Self::Eq(_, v) => cmp(v) == Some(Ordering::Equal),
            Self::Lt(_, v) => cmp(v) == Some(Ordering::Less),
            Self::Le(_, v) => matches!(cmp(v), Some(Ordering::Less | Ordering::Equal)),
            Self::Gt(_, v) => cmp(v) == Some(Ordering::Greater),
            Self::Ge(_, v) => matches!(cmp(v), Some(Ordering::Greater | Ordering::Equal)),
            Self::Between(_, lo, hi) => {
                matches!(cmp(lo), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(cmp(hi), Some(Ordering::Less | Ordering::Equal))
            }
            Self::BeginsWith(_, prefix) => actual
                .as_str()
                .is_some_and(|s| s.starts_with(prefix.as_str())),
        }
    }
}

/// Key condition of a query: partition key equality plus optional sort condition
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition {
    pub partition_attr: String,
    pub partition_value: Value,
    pub sort: Option<SortKeyCondition>,
}

impl KeyCondition {
    /// `partition_attr = value`
    pub fn partition(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            partition_attr: attr.into(),
            partition_value: value.into(),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: SortKeyCondition) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        item.get(&self.partition_attr) == Some(&self.partition_value)
            && self.sort.as_ref().map_or(true, |s| s.matches(item))
    }
}

/// Post-read filter applied to evaluated items; a list of filters is ANDed
#[derive(Clone, Debug, PartialEq)]
pub enum FilterCondition {
    Equals(String, Value),
    NotEquals(String, Value),
    Exists(String),
    NotExists(String),
}

impl FilterCondition {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Equals(a, v) => item.get(a) == Some(v),
            Self::NotEquals(a, v) => item.get(a) != Some(v),
            Self::Exists(a) => item.contains_key(a),
            Self::NotExists(a) => !item.contains_key(a),
        }
    }

    pub fn all_match(filters: &[FilterCondition], item: &Item) -> bool {
        filters.iter().all(|f| f.matches(item))
    }
}

/// Guard on a single-item write, evaluated against the currently stored item
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// No item is stored at the key (`attribute_not_exists(pk)`)
    AttributeNotExists(String),
    /// The stored item has `attr = value`
    AttributeEquals(String, Value),
}

impl Condition {
    pub fn holds(&self, existing: Option<&Item>) -> bool {
        match self {
            Self::AttributeNotExists(attr) => existing.map_or(true, |i| !i.contains_key(attr)),
            Self::AttributeEquals(attr, value) => {
                existing.is_some_and(|i| i.get(attr) == Some(value))
            }
        }
    }
}
