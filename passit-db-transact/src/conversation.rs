//! Unique conversations between two users
//!
//! A conversation between A and B is created with one atomic write of five
//! conditional puts: the pair rows `A#B` and `B#A`, both link rows and the
//! conversation itself. The pair rows make the write fail for any later
//! attempt on the same pair, whichever member initiates it. A failed attempt
//! resolves to the existing conversation through the `B#A` row and the links
//! table's conversation index.

use crate::error::{Result, TransactError};
use crate::model::{
    from_item, new_id, now_timestamp, pair_id, to_item, Conversation, ConversationLink,
    PairIndexRow, PAIR_SEPARATOR,
};
use passit_db_core::item::key1;
use passit_db_core::{
    FilterCondition, KeyCondition, KeyValueStore, PutRequest, TransactWriteItem,
};
use passit_db_query::{Page, PageRequest, Paginator};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Table and index names used by the coordinator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationTables {
    pub conversations: String,
    /// Holds both link rows and pair rows
    pub conversation_links: String,
    /// Index of the links table on `conversationId`
    pub conversation_index: String,
}

impl Default for ConversationTables {
    fn default() -> Self {
        Self {
            conversations: "conversations".to_string(),
            conversation_links: "conv-links".to_string(),
            conversation_index: "conversation-index".to_string(),
        }
    }
}

/// How often to look for the counterpart link after a conflict.
///
/// Secondary indexes are eventually consistent, so a link written by a
/// concurrent request may not be visible on the first read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug)]
pub struct ConversationCoordinator<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    paginator: Paginator<S>,
    tables: ConversationTables,
    recovery: RecoveryPolicy,
}

impl<S: KeyValueStore + ?Sized> ConversationCoordinator<S> {
    pub fn new(store: Arc<S>, tables: ConversationTables) -> Self {
        Self {
            paginator: Paginator::new(Arc::clone(&store)),
            store,
            tables,
            recovery: RecoveryPolicy::default(),
        }
    }

    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn tables(&self) -> &ConversationTables {
        &self.tables
    }

    /// Create the conversation between `member` and `counterpart` unless one
    /// exists, and return the counterpart's link.
    ///
    /// Concurrent calls for the same pair, in either order, all return links
    /// to the same conversation.
    pub async fn create_conversation_between(
        &self,
        member: &str,
        counterpart: &str,
    ) -> Result<ConversationLink> {
        if member == counterpart {
            return Err(TransactError::SameParticipant(member.to_string()));
        }
        if member.is_empty() || counterpart.is_empty() {
            return Err(TransactError::validation("conversation members must be non-empty"));
        }
        // A separator inside an id would let two different pairs share a pair row
        let with_separator = [member, counterpart]
            .into_iter()
            .find(|id| id.contains(PAIR_SEPARATOR));
        if let Some(id) = with_separator {
            return Err(TransactError::validation(format!(
                "member id {} must not contain '{}'",
                id, PAIR_SEPARATOR
            )));
        }

        let span = tracing::debug_span!("create_conversation", member, counterpart);
        async {
            let timestamp = now_timestamp();
            let conversation = Conversation {
                id: new_id(),
                created_at: timestamp.clone(),
                updated_at: timestamp.clone(),
            };
            let link = |user_id: &str| ConversationLink {
                id: new_id(),
                user_id: user_id.to_string(),
                conversation_id: conversation.id.clone(),
                created_at: timestamp.clone(),
                updated_at: timestamp.clone(),
            };
            let member_link = link(member);
            let counterpart_link = link(counterpart);

            let links = &self.tables.conversation_links;
            let put = |table: &str, item| {
                TransactWriteItem::Put(PutRequest::new(table, item).if_not_exists("id"))
            };
            let writes = vec![
                put(links, to_item(&PairIndexRow::new(member, counterpart, &conversation.id))?),
                put(links, to_item(&PairIndexRow::new(counterpart, member, &conversation.id))?),
                put(links, to_item(&member_link)?),
                put(links, to_item(&counterpart_link)?),
                put(&self.tables.conversations, to_item(&conversation)?),
            ];

            match self.store.transact_write(writes).await {
                Ok(()) => {
                    tracing::info!(conversation_id = %conversation.id, "conversation created");
                    Ok(counterpart_link)
                }
                Err(e) if e.is_conditional_failure() => {
                    tracing::debug!("pair already exists, resolving existing conversation");
                    self.resolve_existing(member, counterpart).await
                }
                Err(e) => Err(e.into()),
            }
        }
        .instrument(span)
        .await
    }

    async fn resolve_existing(&self, member: &str, counterpart: &str) -> Result<ConversationLink> {
        let pair = pair_id(counterpart, member);
        let row = self
            .store
            .get_item(&self.tables.conversation_links, &key1("id", pair.as_str()))
            .await?
            .ok_or_else(|| {
                TransactError::inconsistent(format!(
                    "write rejected but pair row {} is missing",
                    pair
                ))
            })?;
        let row: PairIndexRow = from_item(row)?;
        let conversation_id = row
            .conversation_id()
            .ok_or_else(|| {
                TransactError::inconsistent(format!(
                    "pair row {} has a malformed reference",
                    pair
                ))
            })?
            .to_string();

        let request = PageRequest::query(
            self.tables.conversation_links.as_str(),
            KeyCondition::partition("conversationId", conversation_id.as_str()),
        )
        .with_index(self.tables.conversation_index.as_str())
        .with_filter(FilterCondition::Equals("userId".to_string(), counterpart.into()))
        .with_limit(Some(1));

        let attempts = self.recovery.attempts.max(1);
        for attempt in 1..=attempts {
            let page: Page<ConversationLink> = self.paginator.fetch_page(&request).await?;
            if let Some(link) = page.items.into_iter().next() {
                tracing::debug!(%conversation_id, attempt, "resolved existing conversation");
                return Ok(link);
            }
            if attempt < attempts {
                tokio::time::sleep(self.recovery.delay).await;
            }
        }
        Err(TransactError::inconsistent(format!(
            "conversation {} has no link for {}",
            conversation_id, counterpart
        )))
    }
}
