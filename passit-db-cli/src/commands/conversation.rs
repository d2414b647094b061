use crate::error::CliResult;
use passit_db_api::{Backend, ConversationLink, TablesConfig};
use passit_db_core::KeyValueStore;
use std::sync::Arc;

pub async fn run<S: KeyValueStore + ?Sized>(
    store: Arc<S>,
    tables: TablesConfig,
    member_a: &str,
    member_b: &str,
) -> CliResult<ConversationLink> {
    let backend = Backend::new(store, tables);
    Ok(backend.create_conversation_between(member_a, member_b).await?)
}
