use serde::{Deserialize, Serialize};

/// Originator of a security event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub id: i64,
}

/// Typed value attached to a security event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventValue {
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: bool,
}

/// Security event from the events-search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub place_id: i64,
    pub event_type_name: String,
    pub timestamp: String,
    pub message: String,
    pub source: EventSource,
    pub value: EventValue,
    pub event_status_value: Option<String>,
    /// Vendor-defined action descriptors, shape undocumented
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
}
