use crate::error::CliResult;
use passit_db_core::KeyValueStore;
use passit_db_indexer::{
    IndexMigrationController, LifecycleEvent, LifecycleResponse, MigrationConfig,
};
use serde_json::Value;
use std::sync::Arc;

pub fn migration_config(resumable: bool) -> MigrationConfig {
    if resumable {
        MigrationConfig::resumable()
    } else {
        MigrationConfig::default()
    }
}

pub async fn on_event<S: KeyValueStore + ?Sized>(
    store: Arc<S>,
    config: MigrationConfig,
    event: Value,
) -> CliResult<LifecycleResponse> {
    let event: LifecycleEvent = serde_json::from_value(event)?;
    let controller = IndexMigrationController::new(store, config);
    Ok(controller.on_event(&event).await?)
}

pub async fn is_complete<S: KeyValueStore + ?Sized>(
    store: Arc<S>,
    config: MigrationConfig,
    event: Value,
) -> CliResult<LifecycleEvent> {
    let event: LifecycleEvent = serde_json::from_value(event)?;
    let controller = IndexMigrationController::new(store, config);
    Ok(controller.is_complete(event).await?)
}
