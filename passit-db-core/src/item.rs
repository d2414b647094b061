//! Items, keys and value ordering
//!
//! Items are JSON objects. A key is an item restricted to key attributes,
//! which makes continuation keys and primary keys the same shape.

use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A stored item: attribute name to JSON value
pub type Item = Map<String, Value>;

/// A primary (or index + primary) key
pub type Key = Map<String, Value>;

/// Project `item` onto the named attributes.
///
/// Returns `None` if any of the attributes is missing.
pub fn project_key(item: &Item, names: &[&str]) -> Option<Key> {
    let mut key = Key::new();
    for name in names {
        let value = item.get(*name)?;
        key.insert((*name).to_string(), value.clone());
    }
    Some(key)
}

/// True when every attribute of `key` is present in `item` with an equal value
pub fn matches_key(item: &Item, key: &Key) -> bool {
    key.iter().all(|(name, value)| item.get(name) == Some(value))
}

/// Build a single-attribute key
pub fn key1(name: &str, value: impl Into<Value>) -> Key {
    let mut key = Key::new();
    key.insert(name.to_string(), value.into());
    key
}

/// Store ordering for key values: numbers numerically, strings bytewise.
///
/// Values of different kinds are incomparable and return `None`.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64()?, y.as_f64()?);
            x.partial_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => Some(x.as_bytes().cmp(y.as_bytes())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_key_requires_all_names() {
        let item = json!({"id": "a", "userId": "u1", "other": 3});
        let item = item.as_object().unwrap();
        let key = project_key(item, &["userId", "id"]).unwrap();
        assert_eq!(key.len(), 2);
        assert!(matches_key(item, &key));
        assert!(project_key(item, &["missing"]).is_none());
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_values(&json!(9), &json!(10)), Some(Ordering::Less));
        assert_eq!(
            compare_values(&json!("9"), &json!("10")),
            Some(Ordering::Greater)
        );
        assert_eq!(compare_values(&json!("9"), &json!(9)), None);
    }
}
