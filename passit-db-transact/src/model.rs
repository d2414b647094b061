//! Stored entities
//!
//! All entities are stored as camelCase JSON items with RFC 3339 timestamps.

use crate::error::{Result, TransactError};
use chrono::{SecondsFormat, Utc};
use passit_db_core::Item;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator of the members in a pair index row id
pub const PAIR_SEPARATOR: char = '#';

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize an entity into a store item
pub fn to_item<T: Serialize>(value: &T) -> Result<Item> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(item) => Ok(item),
        other => Err(TransactError::validation(format!(
            "entity serialized to a non-object: {}",
            other
        ))),
    }
}

pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(item))?)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Membership of one user in a conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationLink {
    pub id: String,
    pub user_id: String,
    pub conversation_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Uniqueness row for an ordered pair of members
///
/// The conversation id is stored with a `#` prefix so the row never matches
/// a query on the links table's conversation index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairIndexRow {
    pub id: String,
    pub conversation_id: String,
}

impl PairIndexRow {
    pub fn new(first: &str, second: &str, conversation_id: &str) -> Self {
        Self {
            id: pair_id(first, second),
            conversation_id: format!("{}{}", PAIR_SEPARATOR, conversation_id),
        }
    }

    /// The referenced conversation id, without the prefix
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id
            .strip_prefix(PAIR_SEPARATOR)
            .filter(|id| !id.is_empty())
    }
}

pub fn pair_id(first: &str, second: &str) -> String {
    format!("{}{}{}", first, PAIR_SEPARATOR, second)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub state: String,
    pub city: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    #[default]
    Open,
    Closed,
}

/// A tutoring offer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub subject: String,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub tutor_id: String,
    #[serde(default)]
    pub status: ListingStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Fields supplied when creating a listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewListing {
    pub subject: String,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub tutor_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub to: String,
    pub conversation_id: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
