//! Access patterns of the backend

use crate::config::TablesConfig;
use crate::error::{ApiError, Result};
use crate::user::User;
use passit_db_core::item::key1;
use passit_db_core::{KeyCondition, KeyValueStore};
use passit_db_query::{Cursor, Page, PageRequest, Paginator};
use passit_db_transact::model::from_item;
use passit_db_transact::{
    ConversationCoordinator, ConversationLink, Listing, ListingPatch, Message, NewListing,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Reads and writes of the backend over one store
#[derive(Debug)]
pub struct Backend<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    tables: TablesConfig,
    paginator: Paginator<S>,
    conversations: ConversationCoordinator<S>,
}

impl<S: KeyValueStore + ?Sized> Backend<S> {
    pub fn new(store: Arc<S>, tables: TablesConfig) -> Self {
        Self {
            paginator: Paginator::new(Arc::clone(&store)),
            conversations: ConversationCoordinator::new(
                Arc::clone(&store),
                tables.conversation_tables(),
            ),
            store,
            tables,
        }
    }

    pub fn tables(&self) -> &TablesConfig {
        &self.tables
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Conversation between two users, created on first contact. Returns the
    /// counterpart's link.
    pub async fn create_conversation_between(
        &self,
        member: &str,
        counterpart: &str,
    ) -> Result<ConversationLink> {
        Ok(self
            .conversations
            .create_conversation_between(member, counterpart)
            .await?)
    }

    /// Conversations of a user, newest first
    pub async fn user_conversations(
        &self,
        user_id: &str,
        after: Option<Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<ConversationLink>> {
        tracing::debug!(user_id, resumed = after.is_some(), "listing user conversations");
        let request = PageRequest::query(
            self.tables.conversation_links.as_str(),
            KeyCondition::partition("userId", user_id),
        )
        .with_index(self.tables.user_index.as_str())
        .with_after(after)
        .with_limit(limit)
        .descending();
        Ok(self.paginator.fetch_page(&request).await?)
    }

    /// Messages of a conversation, newest first
    pub async fn conversation_messages(
        &self,
        conversation_id: &str,
        after: Option<Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<Message>> {
        let request = PageRequest::query(
            self.tables.messages.as_str(),
            KeyCondition::partition("conversationId", conversation_id),
        )
        .with_index(self.tables.conversation_index.as_str())
        .with_after(after)
        .with_limit(limit)
        .descending();
        Ok(self.paginator.fetch_page(&request).await?)
    }

    /// Listings of one tutor, or of everyone when `tutor_id` is `None`
    pub async fn listings(
        &self,
        tutor_id: Option<&str>,
        after: Option<Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<Listing>> {
        let table = self.tables.listings.as_str();
        let request = match tutor_id {
            Some(tutor_id) => {
                PageRequest::query(table, KeyCondition::partition("tutorId", tutor_id))
                    .with_index(self.tables.tutor_index.as_str())
            }
            None => PageRequest::scan(table),
        }
        .with_after(after)
        .with_limit(limit);
        Ok(self.paginator.fetch_page(&request).await?)
    }

    pub async fn listing(&self, id: &str) -> Result<Listing> {
        self.get(&self.tables.listings, "listing", id).await
    }

    pub async fn create_listing(&self, listing: NewListing) -> Result<Listing> {
        let listings = self.tables.listings.as_str();
        Ok(passit_db_transact::create_listing(&*self.store, listings, listing).await?)
    }

    /// Update a listing owned by `owner`
    pub async fn update_listing(
        &self,
        id: &str,
        owner: &str,
        patch: &ListingPatch,
    ) -> Result<Listing> {
        let listings = self.tables.listings.as_str();
        Ok(passit_db_transact::update_listing(&*self.store, listings, id, owner, patch).await?)
    }

    pub async fn post_message(
        &self,
        conversation_id: &str,
        author: &str,
        to: &str,
        content: &str,
    ) -> Result<Message> {
        Ok(passit_db_transact::post_message(
            &*self.store,
            &self.tables.messages,
            conversation_id,
            author,
            to,
            content,
        )
        .await?)
    }

    pub async fn user(&self, id: &str) -> Result<User> {
        self.get(&self.tables.users, "user", id).await
    }

    async fn get<T: DeserializeOwned>(&self, table: &str, what: &str, id: &str) -> Result<T> {
        match self.store.get_item(table, &key1("id", id)).await? {
            Some(item) => Ok(from_item(item)?),
            None => {
                tracing::debug!(table, id, "{} not found", what);
                Err(ApiError::not_found(format!("{} {}", what, id)))
            }
        }
    }
}
