//! Message writes

use crate::error::{Result, TransactError};
use crate::model::{new_id, now_timestamp, to_item, Message};
use passit_db_core::{KeyValueStore, PutRequest};

/// Store a message from `author` to `to` in a conversation
pub async fn post_message<S: KeyValueStore + ?Sized>(
    store: &S,
    table: &str,
    conversation_id: &str,
    author: &str,
    to: &str,
    content: &str,
) -> Result<Message> {
    if content.trim().is_empty() {
        return Err(TransactError::validation("message content is empty"));
    }
    if author == to {
        return Err(TransactError::SameParticipant(author.to_string()));
    }
    let timestamp = now_timestamp();
    let message = Message {
        id: new_id(),
        content: content.to_string(),
        author_id: author.to_string(),
        to: to.to_string(),
        conversation_id: conversation_id.to_string(),
        created_at: timestamp.clone(),
        updated_at: Some(timestamp),
    };
    store
        .put_item(PutRequest::new(table, to_item(&message)?).if_not_exists("id"))
        .await?;
    tracing::debug!(message_id = %message.id, conversation_id, "message posted");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use passit_db_core::{KeyAttribute, MemoryStore, TableDescriptor};

    #[tokio::test]
    async fn posts_and_validates_messages() {
        let store = MemoryStore::new();
        store.create_table(TableDescriptor::new("messages", KeyAttribute::string("id")));

        let message = post_message(&store, "messages", "c1", "u1", "t1", "hello")
            .await
            .unwrap();
        assert_eq!(message.to, "t1");
        let stored = store.items("messages");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["authorId"], "u1");
        assert_eq!(stored[0]["conversationId"], "c1");

        assert!(post_message(&store, "messages", "c1", "u1", "t1", " ").await.is_err());
        assert!(post_message(&store, "messages", "c1", "u1", "u1", "hi").await.is_err());
    }
}
