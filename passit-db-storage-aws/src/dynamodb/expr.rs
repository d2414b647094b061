//! Rendering typed conditions into DynamoDB expression strings
//!
//! Every attribute name goes through `ExpressionAttributeNames` (`#n0`, ...)
//! so reserved words such as `status` need no special casing, and every value
//! through `ExpressionAttributeValues` (`:v0`, ...).

use super::convert::json_to_attr;
use aws_sdk_dynamodb::types::AttributeValue;
use passit_db_core::{Condition, FilterCondition, KeyCondition, SortKeyCondition};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn name(&mut self, attr: &str) -> String {
        if let Some((placeholder, _)) = self.names.iter().find(|(_, a)| a.as_str() == attr) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), attr.to_string());
        placeholder
    }

    fn value(&mut self, value: &Value) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), json_to_attr(value));
        placeholder
    }

    pub fn key_condition(&mut self, cond: &KeyCondition) -> String {
        let mut expr = format!(
            "{} = {}",
            self.name(&cond.partition_attr),
            self.value(&cond.partition_value)
        );
        if let Some(sort) = &cond.sort {
            expr.push_str(" AND ");
            expr.push_str(&self.sort_condition(sort));
        }
        expr
    }

    fn sort_condition(&mut self, cond: &SortKeyCondition) -> String {
        let name = self.name(cond.attribute());
        match cond {
            SortKeyCondition::Eq(_, v) => format!("{} = {}", name, self.value(v)),
            SortKeyCondition::Lt(_, v) => format!("{} < {}", name, self.value(v)),
            SortKeyCondition::Le(_, v) => format!("{} <= {}", name, self.value(v)),
            SortKeyCondition::Gt(_, v) => format!("{} > {}", name, self.value(v)),
            SortKeyCondition::Ge(_, v) => format!("{} >= {}", name, self.value(v)),
            SortKeyCondition::Between(_, lo, hi) => {
                let lo = self.value(lo);
                let hi = self.value(hi);
                format!("{} BETWEEN {} AND {}", name, lo, hi)
            }
            SortKeyCondition::BeginsWith(_, prefix) => {
                format!(
                    "begins_with({}, {})",
                    name,
                    self.value(&Value::String(prefix.clone()))
                )
            }
        }
    }

    /// ANDed filter expression, `None` when there are no filters
    pub fn filter(&mut self, filters: &[FilterCondition]) -> Option<String> {
        if filters.is_empty() {
            return None;
        }
        let parts: Vec<String> = filters
            .iter()
            .map(|f| match f {
                FilterCondition::Equals(a, v) => format!("{} = {}", self.name(a), self.value(v)),
                FilterCondition::NotEquals(a, v) => {
                    format!("{} <> {}", self.name(a), self.value(v))
                }
                FilterCondition::Exists(a) => format!("attribute_exists({})", self.name(a)),
                FilterCondition::NotExists(a) => {
                    format!("attribute_not_exists({})", self.name(a))
                }
            })
            .collect();
        Some(parts.join(" AND "))
    }

    pub fn condition(&mut self, cond: &Condition) -> String {
        match cond {
            Condition::AttributeNotExists(a) => format!("attribute_not_exists({})", self.name(a)),
            Condition::AttributeEquals(a, v) => format!("{} = {}", self.name(a), self.value(v)),
        }
    }

    /// `SET` update expression
    pub fn update_set(&mut self, set: &[(String, Value)]) -> String {
        let parts: Vec<String> = set
            .iter()
            .map(|(a, v)| format!("{} = {}", self.name(a), self.value(v)))
            .collect();
        format!("SET {}", parts.join(", "))
    }

    /// Placeholder maps; `None` when empty since DynamoDB rejects empty maps
    pub fn into_parts(
        self,
    ) -> (
        Option<HashMap<String, String>>,
        Option<HashMap<String, AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then_some(self.names);
        let values = (!self.values.is_empty()).then_some(self.values);
        (names, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_condition_and_filter_share_names() {
        let mut b = ExpressionBuilder::new();
        let key = b.key_condition(&KeyCondition::partition("conversationId", "c1"));
        let filter = b.filter(&[FilterCondition::Equals("userId".into(), json!("u2"))]);
        assert_eq!(key, "#n0 = :v0");
        assert_eq!(filter.as_deref(), Some("#n1 = :v1"));

        let (names, values) = b.into_parts();
        let names = names.unwrap();
        assert_eq!(names["#n0"], "conversationId");
        assert_eq!(names["#n1"], "userId");
        assert_eq!(values.unwrap()[":v1"], AttributeValue::S("u2".to_string()));
    }

    #[test]
    fn reused_attribute_gets_one_placeholder() {
        let mut b = ExpressionBuilder::new();
        let cond = b.condition(&Condition::AttributeEquals("tutorId".into(), json!("t1")));
        let set = b.update_set(&[("title".into(), json!("x"))]);
        assert_eq!(cond, "#n0 = :v0");
        assert_eq!(set, "SET #n1 = :v1");
        assert_eq!(b.name("tutorId"), "#n0");
    }

    #[test]
    fn not_exists_condition_has_no_values() {
        let mut b = ExpressionBuilder::new();
        let cond = b.condition(&Condition::AttributeNotExists("id".into()));
        assert_eq!(cond, "attribute_not_exists(#n0)");
        let (names, values) = b.into_parts();
        assert!(names.is_some());
        assert!(values.is_none());
    }

    #[test]
    fn between_sort_condition() {
        let mut b = ExpressionBuilder::new();
        let key = b.key_condition(
            &KeyCondition::partition("userId", "u1").with_sort(SortKeyCondition::Between(
                "createdAt".into(),
                json!("2021"),
                json!("2022"),
            )),
        );
        assert_eq!(key, "#n0 = :v0 AND #n1 BETWEEN :v1 AND :v2");
    }
}
