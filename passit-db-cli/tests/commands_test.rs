//! Command handlers against the in-memory store

use clap::Parser;
use passit_db_api::TablesConfig;
use passit_db_cli::cli::{Cli, Commands, LifecycleAction};
use passit_db_cli::commands::{conversation, lifecycle, page};
use passit_db_cli::error::{CliError, EXIT_USAGE};
use passit_db_core::{KeyAttribute, KeyValueStore, MemoryStore, PutRequest, TableDescriptor};
use passit_db_indexer::MigrationConfig;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn create_event() -> serde_json::Value {
    json!({
        "RequestType": "Create",
        "ResourceProperties": {
            "tableName": "messages",
            "primaryPartitionKeyName": "id",
            "primaryPartitionKeyType": "S",
            "indexName": "conversation-index",
            "gsiPartitionKeyName": "conversationId",
            "gsiPartitionKeyType": "S",
            "gsiSortKeyName": "createdAt",
            "gsiSortKeyType": "S",
        }
    })
}

#[test]
fn global_flags_parse_anywhere() {
    let cli = Cli::try_parse_from([
        "passit",
        "page",
        "--table",
        "messages",
        "--partition",
        "conversationId=c1",
        "--limit",
        "5",
        "--region",
        "eu-west-1",
        "-q",
    ])
    .unwrap();
    assert!(cli.quiet);
    assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
    match cli.command {
        Commands::Page {
            partition, limit, ..
        } => {
            assert_eq!(partition, Some(("conversationId".into(), "c1".into())));
            assert_eq!(limit, Some(5));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn lifecycle_subcommands_parse() {
    let cli = Cli::try_parse_from([
        "passit",
        "lifecycle",
        "on-event",
        "--event",
        "event.json",
        "--resumable",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Lifecycle {
            action: LifecycleAction::OnEvent {
                resumable: true,
                ..
            }
        }
    ));
    assert!(Cli::try_parse_from(["passit", "-v", "-q", "lifecycle"]).is_err());
}

#[tokio::test]
async fn resumable_lifecycle_round_trip() {
    let store = MemoryStore::new();
    store.create_table_pending(TableDescriptor::new("messages", KeyAttribute::string("id")), 2);
    let store = Arc::new(store);
    let config = lifecycle::migration_config(true).with_poll_unit(Duration::ZERO);

    let response = lifecycle::on_event(Arc::clone(&store), config.clone(), create_event())
        .await
        .unwrap();
    assert!(!response.is_complete);

    let mut event = create_event();
    event["isComplete"] = json!(false);
    event["data"] = response.data.unwrap();
    let mut checks = 0;
    loop {
        let next = lifecycle::is_complete(Arc::clone(&store), config.clone(), event)
            .await
            .unwrap();
        event = serde_json::to_value(&next).unwrap();
        if next.is_complete == Some(true) {
            break;
        }
        checks += 1;
        assert!(checks < 10, "migration did not converge");
    }
    let desc = store.describe_table("messages").await.unwrap();
    assert!(desc.index("conversation-index").is_some());
}

#[tokio::test]
async fn blocking_lifecycle_completes_in_one_call() {
    let store = MemoryStore::new();
    store.create_table(TableDescriptor::new("messages", KeyAttribute::string("id")));
    let config = MigrationConfig::default().with_poll_unit(Duration::ZERO);
    let response = lifecycle::on_event(Arc::new(store), config, create_event())
        .await
        .unwrap();
    assert!(response.is_complete);
}

#[tokio::test]
async fn malformed_event_is_an_input_error() {
    let err = lifecycle::on_event(
        Arc::new(MemoryStore::new()),
        MigrationConfig::default(),
        json!({"RequestType": "Rename"}),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CliError::Input(_)));
}

#[tokio::test]
async fn page_follows_cursor_tokens() {
    let store = MemoryStore::new();
    store.create_table(TableDescriptor::new("listings", KeyAttribute::string("id")));
    for id in ["l1", "l2", "l3"] {
        store
            .put_item(PutRequest::new(
                "listings",
                json!({"id": id}).as_object().cloned().unwrap(),
            ))
            .await
            .unwrap();
    }
    let store = Arc::new(store);

    let mut args = page::PageArgs {
        table: "listings".into(),
        limit: Some(2),
        ..Default::default()
    };
    let first = page::run(Arc::clone(&store), &args).await.unwrap();
    assert_eq!(first.len(), 2);
    args.after = first.next_cursor.map(|c| c.to_token());
    let second = page::run(Arc::clone(&store), &args).await.unwrap();
    assert_eq!(second.items[0]["id"], "l3");
    assert!(!second.has_more());
}

#[tokio::test]
async fn page_rejects_bad_arguments() {
    let store = Arc::new(MemoryStore::new());
    let args = page::PageArgs {
        table: "listings".into(),
        after: Some("not a cursor".into()),
        ..Default::default()
    };
    let err = page::run(Arc::clone(&store), &args).await.unwrap_err();
    assert_eq!(err.exit_code(), EXIT_USAGE);

    let args = page::PageArgs {
        table: "listings".into(),
        descending: true,
        ..Default::default()
    };
    let err = page::run(store, &args).await.unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
}

#[tokio::test]
async fn conversation_command_prints_counterpart_link() {
    let tables = TablesConfig::default();
    let store = MemoryStore::new();
    store.create_table(TableDescriptor::new(&tables.conversations, KeyAttribute::string("id")));
    store.create_table(TableDescriptor::new(
        &tables.conversation_links,
        KeyAttribute::string("id"),
    ));
    let link = conversation::run(Arc::new(store), tables, "alice", "bob")
        .await
        .unwrap();
    assert_eq!(link.user_id, "bob");
}
