//! Error types for the Dom.ru API client

use thiserror::Error;

use crate::models::ErrorPayload;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credential to authenticate or refresh the session
    #[error("authentication data required: {0}")]
    AuthDataRequired(String),

    /// The transport could not establish a connection
    #[error("connection failed: {0}")]
    ClientConnector(String),

    /// The transport exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The vendor rejected the bearer token (status 401).
    ///
    /// Internal to the request engine: it is always resolved into a
    /// refresh-and-retry or folded into [`ApiError::AuthDataRequired`], and
    /// never reaches a caller of the typed operations.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The target device is offline or unreachable (status 531, code 6007)
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A temporary-code operation was rejected (status 500, code 6005)
    #[error("temporary code operation failed: {0}")]
    TemporaryCodeFailed(String),

    /// Re-authentication kept producing 401 responses
    #[error("authentication retries exhausted after {attempts} attempts")]
    AuthRetriesExhausted { attempts: u32 },

    /// Any other non-success response, or a success body that failed to decode
    #[error("unknown error ({status}): {message}")]
    Unknown { status: u16, message: String },
}

impl ApiError {
    /// Check whether this error means the caller has to supply credentials
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::AuthDataRequired(_))
    }

    /// Classify a non-success response by vendor status and error payload.
    ///
    /// The body is decoded opportunistically: a JSON object yields a full
    /// [`ErrorPayload`], anything else is carried as the raw message. The
    /// dispatch order is significant; status+code pairs are checked before
    /// the bare-status fallback.
    pub(crate) fn classify(status: u16, body: &str) -> ApiError {
        let payload = ErrorPayload::from_body(body);
        let message = payload
            .error_message
            .clone()
            .unwrap_or_else(|| body.to_string());

        match (status, payload.error_code) {
            (403, _) => ApiError::AuthDataRequired(message),
            (531, Some(6007)) => ApiError::DeviceUnavailable(message),
            (500, Some(6005)) => ApiError::TemporaryCodeFailed(message),
            _ => ApiError::Unknown { status, message },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::ClientConnector(err.to_string())
        } else {
            ApiError::Unknown {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}
