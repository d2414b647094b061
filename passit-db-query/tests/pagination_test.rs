use passit_db_core::{
    FilterCondition, IndexDescriptor, Item, KeyAttribute, KeyCondition, KeyValueStore,
    MemoryStore, PutRequest, TableDescriptor,
};
use passit_db_query::{Cursor, Page, PageRequest, Paginator, QueryError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const MESSAGES: &str = "messages";

fn item(v: serde_json::Value) -> Item {
    v.as_object().cloned().unwrap()
}

/// Ten messages in conversation c1, three in c2, inserted out of time order
async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.create_table(TableDescriptor::new(MESSAGES, KeyAttribute::string("id")));
    store
        .create_index(
            MESSAGES,
            IndexDescriptor::new("conversation-index", KeyAttribute::string("conversationId"))
                .with_sort_key(KeyAttribute::number("createdAt")),
        )
        .unwrap();

    let times = [7, 3, 9, 1, 5, 10, 2, 8, 4, 6];
    for t in times {
        let author = if t % 2 == 0 { "alice" } else { "bob" };
        store
            .put_item(PutRequest::new(
                MESSAGES,
                item(json!({
                    "id": format!("m{t}"),
                    "conversationId": "c1",
                    "authorId": author,
                    "createdAt": t,
                })),
            ))
            .await
            .unwrap();
    }
    for t in [1, 2, 3] {
        store
            .put_item(PutRequest::new(
                MESSAGES,
                item(json!({
                    "id": format!("o{t}"),
                    "conversationId": "c2",
                    "authorId": "carol",
                    "createdAt": t,
                })),
            ))
            .await
            .unwrap();
    }
    store
}

fn c1_request() -> PageRequest {
    PageRequest::query(MESSAGES, KeyCondition::partition("conversationId", "c1"))
        .with_index("conversation-index")
}

fn ids(page: &Page<Item>) -> Vec<String> {
    page.items
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect()
}

/// Follow cursors until exhausted, checking every page against the limit
async fn drain(paginator: &Paginator<MemoryStore>, request: PageRequest) -> (Vec<String>, usize) {
    let mut all = Vec::new();
    let mut pages = 0;
    let mut after: Option<Cursor> = None;
    loop {
        let page = paginator
            .fetch_items(&request.clone().with_after(after.take()))
            .await
            .unwrap();
        pages += 1;
        if let Some(limit) = request.limit {
            assert!(page.len() <= limit as usize);
        }
        all.extend(ids(&page));
        match &page.next_cursor {
            Some(next) => {
                assert!(!page.is_empty() || request.limit.is_none());
                after = Some(next.clone());
            }
            None => break,
        }
        assert!(pages < 100, "pagination did not terminate");
    }
    (all, pages)
}

#[tokio::test]
async fn query_pages_respect_limit_and_preserve_order() {
    let store = seeded_store().await;
    let paginator = Paginator::new(Arc::new(store));

    let first = paginator
        .fetch_items(&c1_request().with_limit(Some(4)))
        .await
        .unwrap();
    assert_eq!(ids(&first), vec!["m1", "m2", "m3", "m4"]);
    assert!(first.has_more());

    let (all, pages) = drain(&paginator, c1_request().with_limit(Some(4))).await;
    let expected: Vec<String> = (1..=10).map(|t| format!("m{t}")).collect();
    assert_eq!(all, expected);
    assert_eq!(pages, 3);
}

#[tokio::test]
async fn cursor_is_dropped_when_limit_lands_on_last_item() {
    let store = seeded_store().await;
    let paginator = Paginator::new(Arc::new(store.clone()));

    // The store hands back a continuation key after the tenth item even
    // though nothing follows it
    let page = paginator
        .fetch_items(&c1_request().with_limit(Some(10)))
        .await
        .unwrap();
    assert_eq!(page.len(), 10);
    assert!(page.next_cursor.is_none());

    let page = paginator
        .fetch_items(&c1_request().with_limit(Some(5)))
        .await
        .unwrap();
    let second = paginator
        .fetch_items(&c1_request().with_limit(Some(5)).with_after(page.next_cursor))
        .await
        .unwrap();
    assert_eq!(ids(&second), vec!["m6", "m7", "m8", "m9", "m10"]);
    assert!(second.next_cursor.is_none());
}

#[tokio::test]
async fn every_returned_cursor_yields_more_items() {
    let store = seeded_store().await;
    store.set_page_size(Some(3));
    let paginator = Paginator::new(Arc::new(store));

    for limit in 1..=11 {
        let mut after = None;
        loop {
            let page = paginator
                .fetch_items(&c1_request().with_limit(Some(limit)).with_after(after.take()))
                .await
                .unwrap();
            assert!(page.len() <= limit as usize);
            let Some(next) = page.next_cursor else { break };
            let peek = paginator
                .fetch_items(&c1_request().with_limit(Some(1)).with_after(Some(next.clone())))
                .await
                .unwrap();
            assert_eq!(peek.len(), 1, "dead cursor at limit {limit}");
            after = Some(next);
        }
    }
}

#[tokio::test]
async fn unlimited_fetch_follows_short_reads_to_the_end() {
    let store = seeded_store().await;
    store.set_page_size(Some(2));
    let paginator = Paginator::new(Arc::new(store.clone()));

    let page = paginator.fetch_items(&c1_request()).await.unwrap();
    assert_eq!(page.len(), 10);
    assert!(page.next_cursor.is_none());
    assert!(store.calls().reads >= 5);
}

#[tokio::test]
async fn filtered_reads_fill_the_limit() {
    let store = seeded_store().await;
    let paginator = Paginator::new(Arc::new(store));
    let request = c1_request()
        .with_filter(FilterCondition::Equals("authorId".into(), json!("alice")))
        .with_limit(Some(2));

    let (all, _) = drain(&paginator, request.clone()).await;
    assert_eq!(all, vec!["m2", "m4", "m6", "m8", "m10"]);

    // Last alice message is m10, so a page ending there has no cursor
    let page = paginator
        .fetch_items(&request.clone().with_limit(Some(5)))
        .await
        .unwrap();
    assert_eq!(page.len(), 5);
    assert!(page.next_cursor.is_none());

    // bob's last message is m9; m10 only fails the filter
    let bob = c1_request()
        .with_filter(FilterCondition::Equals("authorId".into(), json!("bob")))
        .with_limit(Some(5));
    let page = paginator.fetch_items(&bob).await.unwrap();
    assert_eq!(ids(&page), vec!["m1", "m3", "m5", "m7", "m9"]);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn descending_query_returns_newest_first() {
    let store = seeded_store().await;
    let paginator = Paginator::new(Arc::new(store));
    let (all, _) = drain(&paginator, c1_request().descending().with_limit(Some(3))).await;
    let expected: Vec<String> = (1..=10).rev().map(|t| format!("m{t}")).collect();
    assert_eq!(all, expected);
}

#[tokio::test]
async fn scan_pages_cover_the_table_in_insertion_order() {
    let store = seeded_store().await;
    let paginator = Paginator::new(Arc::new(store.clone()));
    let expected: Vec<String> = store
        .items(MESSAGES)
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();

    let (all, pages) = drain(&paginator, PageRequest::scan(MESSAGES).with_limit(Some(4))).await;
    assert_eq!(all, expected);
    assert_eq!(pages, 4);
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let paginator = Paginator::new(Arc::new(seeded_store().await));
    let err = paginator
        .fetch_items(&c1_request().with_limit(Some(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidLimit(0)));
}

#[tokio::test]
async fn store_errors_surface_unchanged() {
    let paginator = Paginator::new(Arc::new(MemoryStore::new()));
    let err = paginator
        .fetch_items(&PageRequest::scan("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Store(_)));
}

#[tokio::test]
async fn fetch_page_decodes_typed_items() {
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Message {
        id: String,
        author_id: String,
        created_at: u64,
    }

    let paginator = Paginator::new(Arc::new(seeded_store().await));
    let page: Page<Message> = paginator
        .fetch_page(&c1_request().descending().with_limit(Some(2)))
        .await
        .unwrap();
    assert_eq!(page.items[0].id, "m10");
    assert_eq!(page.items[0].author_id, "alice");
    assert_eq!(page.items[1].created_at, 9);
    assert!(page.has_more());

    let token = page.next_cursor.unwrap().to_token();
    let resumed: Page<Message> = paginator
        .fetch_page(
            &c1_request()
                .descending()
                .with_limit(Some(2))
                .with_after(Some(token.parse().unwrap())),
        )
        .await
        .unwrap();
    assert_eq!(resumed.items[0].id, "m8");
}

#[tokio::test]
async fn dyn_store_is_supported() {
    let store: Arc<dyn KeyValueStore> = Arc::new(seeded_store().await);
    let paginator = Paginator::new(store);
    let page = paginator
        .fetch_items(&c1_request().with_limit(Some(3)))
        .await
        .unwrap();
    assert_eq!(page.len(), 3);
}
