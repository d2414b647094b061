//! Limit-bounded page fetching over queries and scans
//!
//! A fetch issues reads until the caller's limit is reached or the store
//! reports no continuation key. The store bounds *evaluated* items, so a read
//! may return fewer items than asked for (filtered out) while still handing
//! back a continuation key; the remaining limit shrinks only by the items
//! actually collected.
//!
//! A continuation key from the store does not prove that anything follows it.
//! Before a cursor is exposed, a probe read (limit 1) confirms that at least
//! one more matching item exists. Probes walk past filtered-out items until an
//! item or the end of the data is seen.

use crate::cursor::Cursor;
use crate::error::{QueryError, Result};
use crate::page::{Page, PageRequest, ReadMode};
use passit_db_core::{Item, Key, KeyValueStore, ReadOutput};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::Instrument;

/// Fetches pages from a store
#[derive(Debug)]
pub struct Paginator<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> Clone for Paginator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> Paginator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch one page and decode its items
    pub async fn fetch_page<T: DeserializeOwned>(&self, request: &PageRequest) -> Result<Page<T>> {
        self.fetch_items(request).await?.decode()
    }

    /// Fetch one page of raw items
    pub async fn fetch_items(&self, request: &PageRequest) -> Result<Page<Item>> {
        if request.limit == Some(0) {
            return Err(QueryError::InvalidLimit(0));
        }

        let span = tracing::debug_span!(
            "fetch_page",
            table = %request.table_name,
            index = request.index_name.as_deref().unwrap_or("-"),
            mode = request.mode.name(),
            limit = ?request.limit,
        );
        async {
            let mut items = Vec::new();
            let mut remaining = request.limit;
            let mut start = request.after.clone().map(Cursor::into_key);
            let mut reads = 0u32;

            let next_cursor = loop {
                let output = self.read(request, start.take(), remaining).await?;
                reads += 1;
                let added = output.items.len() as u32;
                items.extend(output.items);

                let Some(continuation) = output.last_evaluated_key else {
                    break None;
                };
                if let Some(left) = remaining.as_mut() {
                    *left = left.saturating_sub(added);
                    if *left == 0 {
                        break self.probe(request, continuation).await?;
                    }
                }
                start = Some(continuation);
            };

            tracing::debug!(
                items = items.len(),
                reads,
                has_more = next_cursor.is_some(),
                "page fetched"
            );
            Ok::<_, QueryError>(Page { items, next_cursor })
        }
        .instrument(span)
        .await
    }

    /// Cursor for `continuation` if at least one matching item follows it
    async fn probe(&self, request: &PageRequest, continuation: Key) -> Result<Option<Cursor>> {
        let mut from = continuation.clone();
        loop {
            let output = self.read(request, Some(from), Some(1)).await?;
            if !output.items.is_empty() {
                return Ok(Some(Cursor::new(continuation)));
            }
            match output.last_evaluated_key {
                Some(next) => from = next,
                None => {
                    tracing::debug!("continuation key had nothing after it; cursor dropped");
                    return Ok(None);
                }
            }
        }
    }

    async fn read(
        &self,
        request: &PageRequest,
        start: Option<Key>,
        limit: Option<u32>,
    ) -> Result<ReadOutput> {
        let options = request.read_options(start, limit);
        let output = match &request.mode {
            ReadMode::Query { condition } => {
                self.store
                    .query(&request.table_name, condition, &options)
                    .await?
            }
            ReadMode::Scan => self.store.scan(&request.table_name, &options).await?,
        };
        Ok(output)
    }
}
