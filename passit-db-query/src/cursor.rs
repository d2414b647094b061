//! Opaque pagination cursors
//!
//! A cursor is the continuation key of the read that produced a page, i.e.
//! the primary key (plus index key, for index reads) of the last evaluated
//! item. Callers see it only as a URL-safe token.

use crate::error::{QueryError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use passit_db_core::Key;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct Cursor(Key);

impl Cursor {
    pub fn new(key: Key) -> Self {
        Self(key)
    }

    pub fn key(&self) -> &Key {
        &self.0
    }

    pub fn into_key(self) -> Key {
        self.0
    }

    /// Encode as an opaque token
    pub fn to_token(&self) -> String {
        // Serializing a JSON object map cannot fail
        let json = serde_json::Value::Object(self.0.clone()).to_string();
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    /// Decode a token produced by [`Cursor::to_token`]
    pub fn parse(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| QueryError::invalid_cursor(e.to_string()))?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| QueryError::invalid_cursor(e.to_string()))?;
        match value {
            serde_json::Value::Object(key) if !key.is_empty() => Ok(Self(key)),
            _ => Err(QueryError::invalid_cursor("token is not a key object")),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl FromStr for Cursor {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_token())
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_round_trips_key() {
        let key = json!({"id": "m-9", "conversationId": "c-1", "createdAt": 17})
            .as_object()
            .cloned()
            .unwrap();
        let cursor = Cursor::new(key.clone());
        let token = cursor.to_token();
        assert!(!token.contains('='));
        assert_eq!(Cursor::parse(&token).unwrap().into_key(), key);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(matches!(
            Cursor::parse("not base64!"),
            Err(QueryError::InvalidCursor(_))
        ));
        let array = URL_SAFE_NO_PAD.encode(b"[1,2]");
        assert!(Cursor::parse(&array).is_err());
        let empty = URL_SAFE_NO_PAD.encode(b"{}");
        assert!(Cursor::parse(&empty).is_err());
    }

    #[test]
    fn serializes_as_token_string() {
        let cursor = Cursor::new(json!({"id": "a"}).as_object().cloned().unwrap());
        let json = serde_json::to_value(&cursor).unwrap();
        assert_eq!(json, json!(cursor.to_token()));
        let back: Cursor = serde_json::from_value(json).unwrap();
        assert_eq!(back, cursor);
    }
}
