//! Table configuration

use crate::error::{ApiError, Result};
use passit_db_transact::ConversationTables;

/// Environment variables naming each table
pub const CONVERSATIONS_TABLE_ENV: &str = "CONVERSATIONS_TABLE_NAME";
pub const CONV_LINKS_TABLE_ENV: &str = "CONV_LINKS_TABLE_NAME";
pub const MESSAGES_TABLE_ENV: &str = "MESSAGES_TABLE_NAME";
pub const INSERTIONS_TABLE_ENV: &str = "INSERTIONS_TABLE_NAME";
pub const USERS_TABLE_ENV: &str = "USERS_TABLE_NAME";

/// Names of the tables and secondary indexes the backend reads and writes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablesConfig {
    pub conversations: String,
    /// Conversation links and pair rows
    pub conversation_links: String,
    pub messages: String,
    /// Tutoring listings
    pub listings: String,
    pub users: String,
    /// `userId` index of the links table
    pub user_index: String,
    /// `conversationId` index of the links and messages tables
    pub conversation_index: String,
    /// `tutorId` index of the listings table
    pub tutor_index: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            conversations: "conversations".to_string(),
            conversation_links: "conv-links".to_string(),
            messages: "messages".to_string(),
            listings: "insertions".to_string(),
            users: "users".to_string(),
            user_index: "user-index".to_string(),
            conversation_index: "conversation-index".to_string(),
            tutor_index: "tutor-index".to_string(),
        }
    }
}

impl TablesConfig {
    /// Read table names from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read table names through `lookup`; unset names keep their default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        for (var, slot) in [
            (CONVERSATIONS_TABLE_ENV, &mut config.conversations),
            (CONV_LINKS_TABLE_ENV, &mut config.conversation_links),
            (MESSAGES_TABLE_ENV, &mut config.messages),
            (INSERTIONS_TABLE_ENV, &mut config.listings),
            (USERS_TABLE_ENV, &mut config.users),
        ] {
            if let Some(value) = lookup(var) {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ApiError::config(format!("{} is set but empty", var)));
                }
                *slot = value.to_string();
            }
        }
        Ok(config)
    }

    pub fn conversation_tables(&self) -> ConversationTables {
        ConversationTables {
            conversations: self.conversations.clone(),
            conversation_links: self.conversation_links.clone(),
            conversation_index: self.conversation_index.clone(),
        }
    }
}
