//! Token manager: password hashing and the two authentication flows.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use md5::Md5;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use sha1::{Digest, Sha1};

use crate::client::{Client, Credentials, RequestOptions};
use crate::error::{ApiError, ApiResult};
use crate::models::Token;

// Vendor-defined constants baked into the mobile app.
const HASH2_PREFIX: &str = "DigitalHomeNTKpassword";
const HASH2_SECRET: &str = "789sdgHJs678wertv34712376";

const OPERATOR_HEADER: HeaderName = HeaderName::from_static("operator");

const AUTH_HINT: &str =
    "construct the client with login/password or a refresh token and operator id";

/// SHA-1 digest of the password, base64-encoded.
///
/// The vendor hashes the Latin-1 bytes of the password; code points above
/// U+00FF are truncated to their low byte.
pub(crate) fn hash1(password: &str) -> String {
    let bytes: Vec<u8> = password.chars().map(|c| c as u8).collect();
    BASE64.encode(Sha1::digest(&bytes))
}

/// MD5 hex digest over the vendor's fixed concatenation of login, password
/// and a `YYYYMMDDHHMMSS` UTC timestamp.
pub(crate) fn hash2(login: &str, password: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!(
        "{HASH2_PREFIX}{login}{password}{}{HASH2_SECRET}",
        timestamp.format("%Y%m%d%H%M%S")
    );
    format!("{:x}", Md5::digest(input.as_bytes()))
}

impl Client {
    /// Bring the session into an authenticated state after a 401.
    ///
    /// Refreshes are single-flight: concurrent callers queue on the refresh
    /// lock, and whoever acquires it after the session already moved past
    /// `observed_generation` reuses the fresh token instead of refreshing
    /// again.
    // Boxed return type breaks the async recursion cycle
    // (send -> ensure_authenticated -> ... -> send).
    pub(crate) fn ensure_authenticated(
        &self,
        observed_generation: u64,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ApiResult<()>> + Send + '_>> {
        Box::pin(async move {
            let _guard = self.refresh_lock.lock().await;
            {
                let state = self.state.read().await;
                if state.generation != observed_generation {
                    return Ok(());
                }
            }
            self.authenticate().await
        })
    }

    /// Obtain a fresh token: refresh flow when a refresh token and operator
    /// id are present, else password flow, else `AuthDataRequired`. An
    /// expired or rejected token is never terminal on its own; only the
    /// absence of any usable credential is.
    async fn authenticate(&self) -> ApiResult<()> {
        let refresh = {
            let state = self.state.read().await;
            match (
                state.session.refresh_token.clone(),
                state.session.operator_id,
            ) {
                (Some(token), Some(operator_id)) => Some((token, operator_id)),
                _ => None,
            }
        };

        if let Some((refresh_token, operator_id)) = refresh {
            match self.refresh_session(&refresh_token, operator_id).await {
                Ok(()) => return Ok(()),
                Err(ApiError::Unauthorized(message)) => {
                    // Rotated-out or expired refresh token; fall back to the
                    // password flow when one was supplied.
                    tracing::info!(
                        target: "domru_api::auth",
                        operator_id,
                        "refresh token rejected"
                    );
                    if !matches!(self.credentials, Credentials::Password { .. }) {
                        let message = if message.is_empty() {
                            AUTH_HINT.to_string()
                        } else {
                            message
                        };
                        return Err(ApiError::AuthDataRequired(message));
                    }
                }
                Err(err) => return Err(err),
            }
        }

        match &self.credentials {
            Credentials::Password { login, password } => self.password_login(login, password).await,
            _ => Err(ApiError::AuthDataRequired(AUTH_HINT.to_string())),
        }
    }

    /// Refresh flow: trade the refresh token for a new token record. The
    /// refresh token travels in the Authorization header, the operator id in
    /// the vendor's `Operator` header.
    async fn refresh_session(&self, refresh_token: &str, operator_id: i64) -> ApiResult<()> {
        tracing::info!(target: "domru_api::auth", operator_id, "refreshing session");
        let options = RequestOptions::new()
            .no_credential()
            .header(AUTHORIZATION, bearer_value(refresh_token)?)
            .header(OPERATOR_HEADER, header_value(&operator_id.to_string())?);
        let token: Token = self.get("auth/v2/session/refresh", options).await?;
        self.apply_token(token).await;
        Ok(())
    }

    /// Password flow: both hashes and the wire timestamp are derived from a
    /// single UTC instant.
    async fn password_login(&self, login: &str, password: &str) -> ApiResult<()> {
        tracing::info!(target: "domru_api::auth", login, "authenticating with password");
        let timestamp = Utc::now();
        let body = serde_json::json!({
            "login": login,
            "timestamp": timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "hash1": hash1(password),
            "hash2": hash2(login, password, timestamp),
        });
        let token: Token = self
            .post(
                &format!("auth/v2/auth/{login}/password"),
                RequestOptions::new().no_credential().json(body),
            )
            .await
            .map_err(|err| match err {
                ApiError::Unauthorized(message) => {
                    let message = if message.is_empty() {
                        AUTH_HINT.to_string()
                    } else {
                        message
                    };
                    ApiError::AuthDataRequired(message)
                }
                other => other,
            })?;
        self.apply_token(token).await;
        Ok(())
    }

    /// Replace the whole session with a freshly minted token record.
    async fn apply_token(&self, token: Token) {
        let mut state = self.state.write().await;
        tracing::info!(
            target: "domru_api::auth",
            operator_id = token.operator_id,
            "session tokens updated"
        );
        state.session.access_token = Some(token.access_token);
        state.session.refresh_token = Some(token.refresh_token);
        state.session.operator_id = Some(token.operator_id);
        state.generation += 1;
    }
}

fn bearer_value(token: &str) -> ApiResult<HeaderValue> {
    header_value(&format!("Bearer {token}"))
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| ApiError::Unknown {
        status: 0,
        message: format!("invalid header value: {err}"),
    })
}
