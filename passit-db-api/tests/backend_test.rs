//! End-to-end access patterns over the in-memory store

use passit_db_api::schema::{migration_plans, tables};
use passit_db_api::{
    ApiError, Backend, ListingPatch, ListingStatus, Location, NewListing, TablesConfig,
};
use passit_db_core::{KeyValueStore, MemoryStore, PutRequest};
use passit_db_indexer::{IndexMigrationController, MigrationConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Create every table and migrate its indexes, as provisioning does
async fn provisioned() -> (MemoryStore, Backend<MemoryStore>) {
    let config = TablesConfig::default();
    let store = MemoryStore::new();
    for table in tables(&config) {
        store.create_table(table);
    }
    let store_arc = Arc::new(store.clone());
    let controller = IndexMigrationController::new(
        Arc::clone(&store_arc),
        MigrationConfig::default().with_poll_unit(Duration::ZERO),
    );
    for plan in migration_plans(&config) {
        plan.apply(&controller).await.unwrap();
    }
    (store, Backend::new(store_arc, config))
}

fn listing(tutor: &str, title: &str) -> NewListing {
    NewListing {
        subject: "math".into(),
        title: title.into(),
        description: "one to one lessons".into(),
        location: Location {
            country: "Italy".into(),
            state: "Lazio".into(),
            city: "Rome".into(),
        },
        tutor_id: tutor.into(),
    }
}

#[tokio::test]
async fn conversation_flow_between_student_and_tutor() {
    let (_, backend) = provisioned().await;

    let link = backend
        .create_conversation_between("student", "tutor")
        .await
        .unwrap();
    assert_eq!(link.user_id, "tutor");
    let again = backend
        .create_conversation_between("tutor", "student")
        .await
        .unwrap();
    assert_eq!(again.conversation_id, link.conversation_id);
    assert_eq!(again.user_id, "student");

    let student_view = backend
        .user_conversations("student", None, Some(10))
        .await
        .unwrap();
    assert_eq!(student_view.items.len(), 1);
    assert_eq!(student_view.items[0].conversation_id, link.conversation_id);
    assert!(student_view.next_cursor.is_none());

    let message = backend
        .post_message(&link.conversation_id, "student", "tutor", "hi!")
        .await
        .unwrap();
    let messages = backend
        .conversation_messages(&link.conversation_id, None, None)
        .await
        .unwrap();
    assert_eq!(messages.items, vec![message]);
}

#[tokio::test]
async fn messages_are_paged_newest_first() {
    let (store, backend) = provisioned().await;
    for minute in 0..7 {
        store
            .put_item(PutRequest::new(
                "messages",
                json!({
                    "id": format!("m{minute}"),
                    "content": format!("message {minute}"),
                    "authorId": "a",
                    "to": "b",
                    "conversationId": "c1",
                    "createdAt": format!("2024-05-01T10:0{minute}:00.000Z"),
                })
                .as_object()
                .cloned()
                .unwrap(),
            ))
            .await
            .unwrap();
    }

    let first = backend.conversation_messages("c1", None, Some(3)).await.unwrap();
    let ids: Vec<&str> = first.items.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m6", "m5", "m4"]);

    let second = backend
        .conversation_messages("c1", first.next_cursor.clone(), Some(3))
        .await
        .unwrap();
    let third = backend
        .conversation_messages("c1", second.next_cursor.clone(), Some(3))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 3);
    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].id, "m0");
    assert!(third.next_cursor.is_none());
}

#[tokio::test]
async fn listings_by_tutor_and_for_everyone() {
    let (_, backend) = provisioned().await;
    backend.create_listing(listing("t1", "Algebra")).await.unwrap();
    backend.create_listing(listing("t2", "Geometry")).await.unwrap();
    let created = backend.create_listing(listing("t1", "Calculus")).await.unwrap();

    let mine = backend.listings(Some("t1"), None, None).await.unwrap();
    assert_eq!(mine.items.len(), 2);
    assert!(mine.items.iter().all(|l| l.tutor_id == "t1"));

    let everyone = backend.listings(None, None, Some(2)).await.unwrap();
    assert_eq!(everyone.items.len(), 2);
    let rest = backend
        .listings(None, everyone.next_cursor.clone(), Some(2))
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
    assert!(rest.next_cursor.is_none());

    assert_eq!(backend.listing(&created.id).await.unwrap(), created);
}

#[tokio::test]
async fn listing_updates_are_owner_only() {
    let (_, backend) = provisioned().await;
    let created = backend.create_listing(listing("t1", "Algebra")).await.unwrap();
    let patch = ListingPatch::from_json(&json!({"status": "CLOSED"})).unwrap();

    let err = backend
        .update_listing(&created.id, "intruder", &patch)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let updated = backend.update_listing(&created.id, "t1", &patch).await.unwrap();
    assert_eq!(updated.status, ListingStatus::Closed);
    assert_eq!(backend.listing(&created.id).await.unwrap().status, ListingStatus::Closed);
}

#[tokio::test]
async fn users_are_read_by_id() {
    let (store, backend) = provisioned().await;
    store
        .put_item(PutRequest::new(
            "users",
            json!({
                "id": "u1",
                "email": "ada@example.com",
                "givenName": "Ada",
                "familyName": "Lovelace",
                "createdAt": "2024-01-01T00:00:00.000Z",
            })
            .as_object()
            .cloned()
            .unwrap(),
        ))
        .await
        .unwrap();

    let user = backend.user("u1").await.unwrap();
    assert_eq!(user.given_name, "Ada");
    assert!(user.phone_number.is_none());

    let err = backend.user("u2").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn bad_requests_map_to_client_errors() {
    let (_, backend) = provisioned().await;
    let err = backend
        .conversation_messages("c1", None, Some(0))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = backend
        .create_conversation_between("u1", "u1")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}
