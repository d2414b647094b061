//! Concurrent conversation creation against the in-memory store

use futures::future::join_all;
use passit_db_core::{IndexDescriptor, KeyAttribute, MemoryStore, TableDescriptor};
use passit_db_transact::{ConversationCoordinator, ConversationTables, RecoveryPolicy};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn setup() -> (MemoryStore, Arc<ConversationCoordinator<MemoryStore>>) {
    let tables = ConversationTables {
        conversations: "conv".to_string(),
        conversation_links: "conv-links".to_string(),
        conversation_index: "by-conversation".to_string(),
    };
    let store = MemoryStore::new();
    store.create_table(TableDescriptor::new("conv", KeyAttribute::string("id")));
    store.create_table(TableDescriptor::new("conv-links", KeyAttribute::string("id")));
    store
        .create_index(
            "conv-links",
            IndexDescriptor::new("by-conversation", KeyAttribute::string("conversationId")),
        )
        .unwrap();
    let coordinator = ConversationCoordinator::new(Arc::new(store.clone()), tables).with_recovery(
        RecoveryPolicy {
            attempts: 3,
            delay: Duration::from_millis(1),
        },
    );
    (store, Arc::new(coordinator))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mirrored_requests_converge_on_one_conversation() {
    let (store, coordinator) = setup();

    let handles = (0..16).map(|i| {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            let (member, counterpart) = if i % 2 == 0 {
                ("alice", "bob")
            } else {
                ("bob", "alice")
            };
            let link = coordinator
                .create_conversation_between(member, counterpart)
                .await
                .unwrap();
            assert_eq!(link.user_id, counterpart);
            link
        })
    });
    let links: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let conversation_ids: HashSet<_> = links.iter().map(|l| l.conversation_id.clone()).collect();
    assert_eq!(conversation_ids.len(), 1);
    assert_eq!(store.items("conv").len(), 1);
    // two pair rows and two links
    assert_eq!(store.items("conv-links").len(), 4);

    let link_ids: HashSet<_> = links.iter().map(|l| l.id.clone()).collect();
    assert_eq!(link_ids.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_pairs_do_not_interfere() {
    let (store, coordinator) = setup();
    let pairs = [("a", "b"), ("a", "c"), ("b", "c"), ("c", "a"), ("b", "a")];

    let handles = pairs.iter().map(|(m, c)| {
        let coordinator = Arc::clone(&coordinator);
        let (m, c) = (m.to_string(), c.to_string());
        tokio::spawn(async move { coordinator.create_conversation_between(&m, &c).await })
    });
    let links: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    assert_eq!(store.items("conv").len(), 3);
    assert_eq!(links[0].conversation_id, links[4].conversation_id);
    assert_eq!(links[1].conversation_id, links[3].conversation_id);
    assert_ne!(links[0].conversation_id, links[2].conversation_id);
}
