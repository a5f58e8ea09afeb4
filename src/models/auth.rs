use serde::{Deserialize, Serialize};

/// Token record returned by both the password-auth and session-refresh
/// endpoints. Replaces the whole session: the refresh token rotates on
/// every successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub operator_id: i64,
    pub operator_name: String,
    pub token_type: Option<String>,
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: String,
    pub refresh_expires_in: Option<i64>,
}

/// Error payload decoded opportunistically from non-success response bodies.
///
/// The vendor is inconsistent here: the body may be a JSON object with any
/// subset of these fields, a bare JSON string, or not JSON at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

impl ErrorPayload {
    /// Best-effort decode of a response body.
    pub(crate) fn from_body(body: &str) -> ErrorPayload {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::String(message)) => ErrorPayload {
                error_message: Some(message),
                ..ErrorPayload::default()
            },
            Ok(value) => serde_json::from_value(value).unwrap_or_default(),
            Err(_) => ErrorPayload::default(),
        }
    }
}
