//! JSON item <-> DynamoDB attribute map conversion

use aws_sdk_dynamodb::types::AttributeValue;
use passit_db_core::Item;
use serde_json::Value;
use std::collections::HashMap;

/// Convert a JSON item into a DynamoDB attribute map
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(k, v)| (k.clone(), json_to_attr(v)))
        .collect()
}

/// Convert a DynamoDB attribute map into a JSON item.
///
/// Binary attributes have no JSON form and are skipped.
pub fn attributes_to_item(map: &HashMap<String, AttributeValue>) -> Item {
    map.iter()
        .filter_map(|(k, v)| attr_to_json(v).map(|val| (k.clone(), val)))
        .collect()
}

/// Convert a single DynamoDB AttributeValue to JSON Value
pub fn attr_to_json(attr: &AttributeValue) -> Option<Value> {
    match attr {
        AttributeValue::S(s) => Some(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Some(Value::Bool(*b)),
        AttributeValue::Null(_) => Some(Value::Null),
        AttributeValue::L(list) => Some(Value::Array(
            list.iter().filter_map(attr_to_json).collect(),
        )),
        AttributeValue::M(map) => Some(Value::Object(attributes_to_item(map))),
        AttributeValue::Ss(set) => Some(Value::Array(
            set.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(set) => Some(Value::Array(
            set.iter().filter_map(|n| parse_number(n)).collect(),
        )),
        _ => None, // Skip binary and other types
    }
}

/// Convert a single JSON Value to DynamoDB AttributeValue
pub fn json_to_attr(val: &Value) -> AttributeValue {
    match val {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(arr) => AttributeValue::L(arr.iter().map(json_to_attr).collect()),
        Value::Object(obj) => AttributeValue::M(item_to_attributes(obj)),
    }
}

fn parse_number(n: &str) -> Option<Value> {
    // Try to parse as i64 first, then f64
    if let Ok(i) = n.parse::<i64>() {
        Some(Value::Number(i.into()))
    } else if let Ok(f) = n.parse::<f64>() {
        serde_json::Number::from_f64(f).map(Value::Number)
    } else {
        None
    }
}
