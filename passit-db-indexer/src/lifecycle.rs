//! Resource lifecycle protocol
//!
//! The orchestration host sends one `on_event` call per requested operation
//! and then repeats the `is_complete` call with the same event (plus the
//! latest `isComplete`/`data`) until it reports completion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Event delivered by the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    #[serde(alias = "RequestType")]
    pub request_type: RequestType,
    #[serde(alias = "ResourceProperties", default)]
    pub resource_properties: Value,
    /// Completion reported by the previous call, on completion checks
    #[serde(alias = "IsComplete", default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    #[serde(alias = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LifecycleEvent {
    pub fn new(request_type: RequestType, resource_properties: Value) -> Self {
        Self {
            request_type,
            resource_properties,
            is_complete: None,
            data: None,
        }
    }

    /// Fold a response into the event, as the host does before a completion check
    pub fn with_response(mut self, response: LifecycleResponse) -> Self {
        self.is_complete = Some(response.is_complete);
        self.data = response.data;
        self
    }
}

/// Answer to `on_event`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResponse {
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LifecycleResponse {
    pub fn complete() -> Self {
        Self {
            is_complete: true,
            data: None,
        }
    }

    pub fn pending(data: Value) -> Self {
        Self {
            is_complete: false,
            data: Some(data),
        }
    }
}
