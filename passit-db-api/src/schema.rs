//! Tables and secondary indexes of the backend
//!
//! Tables are created with their primary key only. Secondary indexes are
//! added afterwards through index migrations, one at a time per table.

use crate::config::TablesConfig;
use passit_db_core::{IndexDescriptor, KeyAttribute, TableDescriptor};
use passit_db_indexer::MigrationPlan;

fn keyed_by_id(table_name: &str) -> TableDescriptor {
    TableDescriptor::new(table_name, KeyAttribute::string("id"))
}

/// Every table the backend uses
pub fn tables(config: &TablesConfig) -> Vec<TableDescriptor> {
    [
        &config.conversations,
        &config.conversation_links,
        &config.messages,
        &config.listings,
        &config.users,
    ]
    .into_iter()
    .map(|name| keyed_by_id(name))
    .collect()
}

/// Index migrations for every table that has secondary indexes
pub fn migration_plans(config: &TablesConfig) -> Vec<MigrationPlan> {
    let created_at = || KeyAttribute::string("createdAt");
    vec![
        MigrationPlan::new(keyed_by_id(&config.conversation_links))
            .with_index(
                IndexDescriptor::new(&config.user_index, KeyAttribute::string("userId"))
                    .with_sort_key(created_at()),
            )
            .with_index(IndexDescriptor::new(
                &config.conversation_index,
                KeyAttribute::string("conversationId"),
            )),
        MigrationPlan::new(keyed_by_id(&config.messages)).with_index(
            IndexDescriptor::new(
                &config.conversation_index,
                KeyAttribute::string("conversationId"),
            )
            .with_sort_key(created_at()),
        ),
        MigrationPlan::new(keyed_by_id(&config.listings)).with_index(IndexDescriptor::new(
            &config.tutor_index,
            KeyAttribute::string("tutorId"),
        )),
    ]
}
