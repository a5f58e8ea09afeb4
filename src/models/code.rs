use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time-bounded access code for a device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalCode {
    pub code: String,
    pub update_date: DateTime<Utc>,
    pub access_control_id: i64,
    #[serde(rename = "type")]
    pub code_type: String,
}
