//! Page requests and results

use crate::cursor::Cursor;
use crate::error::Result;
use passit_db_core::{FilterCondition, Item, Key, KeyCondition, ReadOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Which read primitive backs a page
#[derive(Clone, Debug, PartialEq)]
pub enum ReadMode {
    /// Key-conditioned read, ordered by the source's sort key
    Query { condition: KeyCondition },
    /// Unconditioned read in store-native order
    Scan,
}

impl ReadMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Query { .. } => "query",
            Self::Scan => "scan",
        }
    }
}

/// A request for one page of a table or index
#[derive(Clone, Debug, PartialEq)]
pub struct PageRequest {
    pub table_name: String,
    pub index_name: Option<String>,
    pub mode: ReadMode,
    pub filter: Vec<FilterCondition>,
    /// Resume after the position this cursor encodes
    pub after: Option<Cursor>,
    /// Upper bound on the number of returned items; unbounded when `None`
    pub limit: Option<u32>,
    pub scan_forward: bool,
}

impl PageRequest {
    pub fn query(table_name: impl Into<String>, condition: KeyCondition) -> Self {
        Self::new(table_name, ReadMode::Query { condition })
    }

    pub fn scan(table_name: impl Into<String>) -> Self {
        Self::new(table_name, ReadMode::Scan)
    }

    fn new(table_name: impl Into<String>, mode: ReadMode) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            mode,
            filter: Vec::new(),
            after: None,
            limit: None,
            scan_forward: true,
        }
    }

    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_filter(mut self, filter: FilterCondition) -> Self {
        self.filter.push(filter);
        self
    }

    pub fn with_after(mut self, after: Option<Cursor>) -> Self {
        self.after = after;
        self
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Read the sort key in descending order (queries only)
    pub fn descending(mut self) -> Self {
        self.scan_forward = false;
        self
    }

    pub(crate) fn read_options(&self, start: Option<Key>, limit: Option<u32>) -> ReadOptions {
        ReadOptions {
            index_name: self.index_name.clone(),
            filter: self.filter.clone(),
            exclusive_start_key: start,
            limit,
            scan_forward: self.scan_forward,
        }
    }
}

/// Items of one page plus the cursor for the next one
///
/// `next_cursor` is present only when at least one further item exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(rename = "after", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Page<Item> {
    /// Decode every item into `T`, keeping the cursor
    pub fn decode<T: DeserializeOwned>(self) -> Result<Page<T>> {
        let items = self
            .items
            .into_iter()
            .map(|item| serde_json::from_value(serde_json::Value::Object(item)))
            .collect::<std::result::Result<Vec<T>, _>>()?;
        Ok(Page {
            items,
            next_cursor: self.next_cursor,
        })
    }
}
