use serde::{Deserialize, Serialize};

/// Access-control unit (intercom, gate or camera) attached to a place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub operator_id: i64,
    pub name: String,
    pub forpost_group_id: String,
    pub forpost_account_id: Option<String>,
    #[serde(rename = "type")]
    pub device_type: String,
    pub allow_open: bool,
    pub open_method: String,
    pub allow_video: bool,
    pub allow_call_mobile: bool,
    pub allow_slideshow: bool,
    pub preview_available: bool,
    pub video_download_available: bool,
    pub time_zone: i64,
    pub quota: i64,
    pub external_camera_id: String,
    pub external_device_id: Option<String>,
}

/// Outcome of an open-intercom action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResult {
    pub status: bool,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}
