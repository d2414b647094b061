//! Several index additions on one table, one at a time
//!
//! A table accepts one index creation at a time, so each migration starts
//! only after the previous one has converged.

use crate::error::Result;
use crate::migration::{IndexMigrationController, MigrationState};
use passit_db_core::{IndexDescriptor, KeyValueStore, TableDescriptor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationPlan {
    pub table: TableDescriptor,
    pub indexes: Vec<IndexDescriptor>,
}

impl MigrationPlan {
    pub fn new(table: TableDescriptor) -> Self {
        Self {
            table,
            indexes: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(index);
        self
    }

    /// Migrate every index in order, stopping at the first failure
    pub async fn apply<S: KeyValueStore + ?Sized>(
        &self,
        controller: &IndexMigrationController<S>,
    ) -> Result<Vec<MigrationState>> {
        let mut states = Vec::with_capacity(self.indexes.len());
        for (position, index) in self.indexes.iter().enumerate() {
            tracing::info!(
                table = %self.table.table_name,
                index = %index.index_name,
                position = position + 1,
                total = self.indexes.len(),
                "starting index migration"
            );
            states.push(controller.migrate(&self.table, index).await?);
        }
        Ok(states)
    }
}
