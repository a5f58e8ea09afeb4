use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Production endpoint of the vendor API
pub const BASE_URL: &str = "https://myhome.proptech.ru/";

// The vendor only accepts requests that look like its mobile app.
const USER_AGENT_VALUE: &str = "Xiaomi MIX2S | Android 10 | erth | 8.26.0 (82600010) | | null | \
                                d5c78d0a-9cbe-4bea-b66a-b8296d947b62 | null";
const CONTENT_TYPE_VALUE: &str = "application/json; charset=UTF-8";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_AUTH_RETRIES: u32 = 3;

/// Credential shape supplied at construction. Immutable for the lifetime of
/// the client; only the session tokens derived from it ever change.
#[derive(Debug, Clone)]
pub(crate) enum Credentials {
    Password { login: String, password: String },
    RefreshToken { refresh_token: String, operator_id: i64 },
    None,
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    max_auth_retries: u32,
}

impl ClientConfig {
    /// Configure a client that authenticates with login and password
    pub fn with_password(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::from_credentials(Credentials::Password {
            login: login.into(),
            password: password.into(),
        })
    }

    /// Configure a client that authenticates with a previously issued
    /// refresh token and its operator id
    pub fn with_refresh_token(refresh_token: impl Into<String>, operator_id: i64) -> Self {
        Self::from_credentials(Credentials::RefreshToken {
            refresh_token: refresh_token.into(),
            operator_id,
        })
    }

    /// Configure a client without credentials. Any request the vendor
    /// rejects with 401 then fails with [`ApiError::AuthDataRequired`].
    pub fn anonymous() -> Self {
        Self::from_credentials(Credentials::None)
    }

    fn from_credentials(credentials: Credentials) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            max_auth_retries: DEFAULT_MAX_AUTH_RETRIES,
        }
    }

    /// Override the API base URL (mainly for testing against a stub server)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Total per-request timeout, connection establishment included
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Maximum number of refresh-and-retry cycles a single call may spend
    /// on 401 responses before giving up with
    /// [`ApiError::AuthRetriesExhausted`]
    pub fn max_auth_retries(mut self, retries: u32) -> Self {
        self.max_auth_retries = retries;
        self
    }
}

/// Snapshot of the authentication session.
///
/// Callers that want to persist credentials across restarts can read the
/// rotated refresh token and operator id after any successful call.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub operator_id: Option<i64>,
}

/// Session plus a generation counter used to single-flight refreshes:
/// a 401 handler that lost the refresh race sees a newer generation and
/// reuses the fresh token instead of refreshing again.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) session: Session,
    pub(crate) generation: u64,
}

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
    pub(crate) credential: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self {
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            credential: true,
        }
    }

    /// Append a query-string parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add an extra header
    pub fn header(mut self, key: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Send without the bearer access token (auth endpoints). A 401 on
    /// such a request is terminal for the request engine; the token
    /// manager decides how to recover.
    pub fn no_credential(mut self) -> Self {
        self.credential = false;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Async client for the Dom.ru intercom API.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
/// Transport resources are released when the last clone is dropped.
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    base_url: Url,
    pub(crate) credentials: Credentials,
    max_auth_retries: u32,
    pub(crate) state: Arc<RwLock<SessionState>>,
    pub(crate) refresh_lock: Arc<Mutex<()>>,
}

impl Client {
    /// Create a new client from the given configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|err| ApiError::Unknown {
            status: 0,
            message: format!("invalid base url {}: {err}", config.base_url),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_VALUE));

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let mut state = SessionState::default();
        if let Credentials::RefreshToken {
            refresh_token,
            operator_id,
        } = &config.credentials
        {
            state.session.refresh_token = Some(refresh_token.clone());
            state.session.operator_id = Some(*operator_id);
        }

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials,
            max_auth_retries: config.max_auth_retries,
            state: Arc::new(RwLock::new(state)),
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Snapshot of the current session tokens
    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    /// Current bearer access token, if the client has authenticated
    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.session.access_token.clone()
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.send(Method::GET, path, options).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.send(Method::POST, path, options).await
    }

    /// Send a request and decode the JSON response body.
    ///
    /// Drives the re-authentication loop: a 401 on a credentialed request
    /// refreshes the session (single-flight across concurrent callers) and
    /// retries with the new token, up to the configured retry budget. All
    /// other outcomes are classified once and returned.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        let mut auth_attempts: u32 = 0;

        loop {
            let (token, generation) = {
                let state = self.state.read().await;
                (state.session.access_token.clone(), state.generation)
            };

            let request_id = Uuid::new_v4().simple().to_string();
            let mut request = self.http.request(method.clone(), url.clone());
            if !options.query.is_empty() {
                request = request.query(&options.query);
            }
            if let Some(body) = &options.body {
                request = request.json(body);
            }
            if !options.headers.is_empty() {
                request = request.headers(options.headers.clone());
            }
            if options.credential {
                if let Some(token) = &token {
                    request = request.bearer_auth(token);
                }
            }

            tracing::info!(
                target: "domru_api::client",
                request = %request_id,
                method = %method,
                url = %url,
                params = ?options.query,
                body = ?options.body,
                "sending request"
            );

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    let err = ApiError::from(err);
                    tracing::error!(
                        target: "domru_api::client",
                        request = %request_id,
                        error = %err,
                        "transport failure"
                    );
                    return Err(err);
                }
            };

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                let body = response.text().await.unwrap_or_default();
                if !options.credential {
                    tracing::error!(
                        target: "domru_api::client",
                        request = %request_id,
                        "auth request rejected"
                    );
                    return Err(ApiError::Unauthorized(body));
                }
                auth_attempts += 1;
                if auth_attempts > self.max_auth_retries {
                    tracing::error!(
                        target: "domru_api::client",
                        request = %request_id,
                        attempts = auth_attempts - 1,
                        "authentication retries exhausted"
                    );
                    return Err(ApiError::AuthRetriesExhausted {
                        attempts: auth_attempts - 1,
                    });
                }
                tracing::info!(
                    target: "domru_api::client",
                    request = %request_id,
                    attempt = auth_attempts,
                    "unauthorized, refreshing session"
                );
                self.ensure_authenticated(generation).await?;
                continue;
            }

            let text = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    let err = ApiError::from(err);
                    tracing::error!(
                        target: "domru_api::client",
                        request = %request_id,
                        status = status.as_u16(),
                        error = %err,
                        "failed to read response body"
                    );
                    return Err(err);
                }
            };

            if status != StatusCode::OK {
                let err = ApiError::classify(status.as_u16(), &text);
                tracing::error!(
                    target: "domru_api::client",
                    request = %request_id,
                    status = status.as_u16(),
                    body = %text,
                    "unsuccessful request"
                );
                return Err(err);
            }

            return match serde_json::from_str::<T>(&text) {
                Ok(value) => {
                    tracing::info!(
                        target: "domru_api::client",
                        request = %request_id,
                        status = status.as_u16(),
                        "request succeeded"
                    );
                    Ok(value)
                }
                Err(err) => {
                    tracing::error!(
                        target: "domru_api::client",
                        request = %request_id,
                        status = status.as_u16(),
                        error = %err,
                        "failed to decode response body"
                    );
                    Err(ApiError::Unknown {
                        status: status.as_u16(),
                        message: format!("failed to decode response body: {err}"),
                    })
                }
            };
        }
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|err| ApiError::Unknown {
            status: 0,
            message: format!("invalid endpoint {path}: {err}"),
        })
    }
}
