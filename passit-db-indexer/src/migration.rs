//! Index migration state machine and controller
//!
//! ```text
//! Pending -> WaitingTableActive -> Submitting -> WaitingIndexActive -> Done
//!                                      |
//!                                      +-> Failed
//! ```
//!
//! Describe failures while waiting count as "not active yet" and are retried
//! without limit. A rejected schema update is fatal; the host retries the
//! whole operation, which is safe because the store refuses duplicate index
//! names.

use crate::config::{LifecycleMode, MigrationConfig};
use crate::error::{IndexerError, Result};
use crate::lifecycle::{LifecycleEvent, LifecycleResponse, RequestType};
use crate::properties::GsiResourceProperties;
use passit_db_core::{
    IndexDescriptor, KeyAttribute, KeyValueStore, TableDescription, TableDescriptor,
    UpdateTableRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationPhase {
    #[default]
    Pending,
    WaitingTableActive,
    Submitting,
    WaitingIndexActive,
    Done,
    Failed,
}

impl MigrationPhase {
    pub fn is_waiting(self) -> bool {
        matches!(self, Self::WaitingTableActive | Self::WaitingIndexActive)
    }
}

/// Progress of one migration, persisted between completion checks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationState {
    pub phase: MigrationPhase,
    /// Failed convergence checks in the current phase
    pub attempt: u32,
}

impl MigrationState {
    fn enter(&mut self, phase: MigrationPhase) {
        self.phase = phase;
        self.attempt = 0;
    }
}

/// Attribute definitions for adding `index`: the table's partition key and
/// the index keys, without duplicates
pub fn attribute_definitions(
    table: &TableDescriptor,
    index: &IndexDescriptor,
) -> Vec<KeyAttribute> {
    let mut defs: Vec<KeyAttribute> = Vec::new();
    for attr in [
        Some(&table.partition_key),
        Some(&index.partition_key),
        index.sort_key.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        if !defs.iter().any(|d| d.name == attr.name) {
            defs.push(attr.clone());
        }
    }
    defs
}

fn table_converged(desc: &TableDescription) -> bool {
    desc.status.is_active() && desc.indexes_active()
}

/// Drives a store's schema administration until an index is ACTIVE
#[derive(Debug)]
pub struct IndexMigrationController<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    config: MigrationConfig,
}

impl<S: KeyValueStore + ?Sized> IndexMigrationController<S> {
    pub fn new(store: Arc<S>, config: MigrationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Handle a lifecycle request
    ///
    /// Only `Create` touches the store. `Update` and `Delete` complete
    /// immediately: indexes are never altered or removed here.
    pub async fn on_event(&self, event: &LifecycleEvent) -> Result<LifecycleResponse> {
        match event.request_type {
            RequestType::Update | RequestType::Delete => {
                tracing::info!(request = ?event.request_type, "index resource left unchanged");
                Ok(LifecycleResponse::complete())
            }
            RequestType::Create => {
                let (table, index) = Self::descriptors(event)?;
                match self.config.mode {
                    LifecycleMode::Blocking => {
                        self.migrate(&table, &index).await?;
                        Ok(LifecycleResponse::complete())
                    }
                    LifecycleMode::Resumable => {
                        let state = self
                            .advance(&table, &index, MigrationState::default())
                            .await?;
                        Self::response(state)
                    }
                }
            }
        }
    }

    /// Handle a completion check
    ///
    /// In blocking mode the event is returned unchanged. In resumable mode the
    /// migration state in `data` is advanced as far as possible without
    /// waiting.
    pub async fn is_complete(&self, event: LifecycleEvent) -> Result<LifecycleEvent> {
        if self.config.mode == LifecycleMode::Blocking
            || event.request_type != RequestType::Create
            || event.is_complete == Some(true)
        {
            return Ok(event);
        }
        let state: MigrationState = match &event.data {
            Some(data) => serde_json::from_value(data.clone())
                .map_err(|e| IndexerError::invalid_state(e.to_string()))?,
            None => MigrationState::default(),
        };
        if state.phase == MigrationPhase::Failed {
            return Err(IndexerError::invalid_state("migration already failed"));
        }
        let (table, index) = Self::descriptors(&event)?;
        let state = self.advance(&table, &index, state).await?;
        Ok(event.with_response(Self::response(state)?))
    }

    /// Run a migration to completion, sleeping between polls
    pub async fn migrate(
        &self,
        table: &TableDescriptor,
        index: &IndexDescriptor,
    ) -> Result<MigrationState> {
        let mut state = MigrationState::default();
        while state.phase != MigrationPhase::Done {
            if state.phase.is_waiting() {
                let delay = self.config.poll_delay(state.attempt);
                tracing::debug!(
                    table = %table.table_name,
                    phase = ?state.phase,
                    attempt = state.attempt,
                    delay_ms = delay.as_millis() as u64,
                    "waiting before next poll"
                );
                tokio::time::sleep(delay).await;
            }
            self.step(table, index, &mut state).await?;
        }
        Ok(state)
    }

    /// Take steps until the migration is done or a convergence check fails
    pub async fn advance(
        &self,
        table: &TableDescriptor,
        index: &IndexDescriptor,
        mut state: MigrationState,
    ) -> Result<MigrationState> {
        loop {
            self.step(table, index, &mut state).await?;
            if state.phase == MigrationPhase::Done
                || (state.phase.is_waiting() && state.attempt > 0)
            {
                return Ok(state);
            }
        }
    }

    /// Perform one transition
    ///
    /// Waiting phases issue exactly one describe call and never sleep. A
    /// rejected schema update moves the state to `Failed` and returns the
    /// error.
    pub async fn step(
        &self,
        table: &TableDescriptor,
        index: &IndexDescriptor,
        state: &mut MigrationState,
    ) -> Result<()> {
        let table_name = table.table_name.as_str();
        match state.phase {
            MigrationPhase::Pending => state.enter(MigrationPhase::WaitingTableActive),
            MigrationPhase::WaitingTableActive => {
                if self.poll(table_name, None, state.attempt).await {
                    tracing::debug!(table = table_name, "table is active");
                    state.enter(MigrationPhase::Submitting);
                } else {
                    state.attempt += 1;
                }
            }
            MigrationPhase::Submitting => {
                let request = UpdateTableRequest {
                    table_name: table_name.to_string(),
                    attribute_definitions: attribute_definitions(table, index),
                    create_index: index.clone(),
                };
                if let Err(e) = self.store.update_table(request).await {
                    tracing::error!(
                        table = table_name,
                        index = %index.index_name,
                        error = %e,
                        "failed to add index"
                    );
                    state.enter(MigrationPhase::Failed);
                    return Err(IndexerError::SchemaUpdate {
                        table_name: table_name.to_string(),
                        index_name: index.index_name.clone(),
                        source: e,
                    });
                }
                tracing::info!(
                    table = table_name,
                    index = %index.index_name,
                    "index creation submitted, waiting for it to become active"
                );
                state.enter(MigrationPhase::WaitingIndexActive);
            }
            MigrationPhase::WaitingIndexActive => {
                if self
                    .poll(table_name, Some(&index.index_name), state.attempt)
                    .await
                {
                    tracing::info!(
                        table = table_name,
                        index = %index.index_name,
                        "index is active"
                    );
                    state.enter(MigrationPhase::Done);
                } else {
                    state.attempt += 1;
                }
            }
            MigrationPhase::Done => {}
            MigrationPhase::Failed => {
                return Err(IndexerError::invalid_state("cannot resume a failed migration"));
            }
        }
        Ok(())
    }

    /// One convergence check: table ACTIVE, every index ACTIVE and, when
    /// given, `index_name` present
    async fn poll(&self, table_name: &str, index_name: Option<&str>, attempt: u32) -> bool {
        match self.store.describe_table(table_name).await {
            Ok(desc) => {
                let converged =
                    table_converged(&desc) && index_name.map_or(true, |n| desc.index(n).is_some());
                if !converged {
                    tracing::debug!(
                        table = table_name,
                        status = ?desc.status,
                        attempt,
                        "table or indexes not active yet"
                    );
                }
                converged
            }
            Err(e) => {
                tracing::debug!(
                    table = table_name,
                    error = %e,
                    attempt,
                    "describe failed, retrying"
                );
                false
            }
        }
    }

    fn descriptors(event: &LifecycleEvent) -> Result<(TableDescriptor, IndexDescriptor)> {
        GsiResourceProperties::from_value(&event.resource_properties)?.to_descriptors()
    }

    fn response(state: MigrationState) -> Result<LifecycleResponse> {
        if state.phase == MigrationPhase::Done {
            Ok(LifecycleResponse::complete())
        } else {
            Ok(LifecycleResponse::pending(serde_json::to_value(state)?))
        }
    }
}
