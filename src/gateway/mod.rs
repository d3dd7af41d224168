use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::storage::{SharedStore, LOGIN_TIME_KEY, TOKEN_KEY};

/// Window after a successful login during which a 401 is attributed to an
/// in-flight request issued with the pre-login (absent) token.
pub const LOGIN_GRACE_PERIOD_MS: i64 = 5000;

/// Credential-probe paths (password managers and similar non-application
/// callers) whose 401s must never tear the session down.
const EXCLUDED_401_PATH: &str = "/credentials";

/// Sink invoked when a 401 outside the grace period forces the session
/// down; the embedder decides what "go to the login entry point" means.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Redirect sink that does nothing.
#[derive(Debug, Default)]
pub struct NoopRedirect;

impl LoginRedirect for NoopRedirect {
    fn redirect_to_login(&self) {}
}

/// Uniform request shaping and response-error normalization for one
/// backend service. Every outbound call carries a JSON content type and,
/// when the durable store holds a token, a bearer authorization header.
#[derive(Clone)]
pub struct RequestGateway {
    http: reqwest::Client,
    base_url: String,
    durable: SharedStore,
    ephemeral: SharedStore,
    redirect: Arc<dyn LoginRedirect>,
}

impl RequestGateway {
    pub fn new(
        base_url: impl Into<String>,
        durable: SharedStore,
        ephemeral: SharedStore,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("http client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            durable,
            ephemeral,
            redirect,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Method::GET, path, None::<&()>, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.execute(Method::GET, path, None::<&()>, query).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, Some(body), &[]).await
    }

    /// POST without a body, for action endpoints like mark-read.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Method::POST, path, None::<&()>, &[]).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, path, Some(body), &[]).await
    }

    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = self.durable.get(TOKEN_KEY) {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Payload(e.to_string()));
        }

        let message = error_message(status, response.json::<serde_json::Value>().await.ok());
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.handle_unauthorized(path, message));
        }
        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }

    /// 401 classification. A 401 right after login is usually a stale
    /// response to a request that raced the token write, and must not log
    /// the freshly-authenticated user straight back out.
    fn handle_unauthorized(&self, path: &str, message: String) -> ClientError {
        if path.contains(EXCLUDED_401_PATH) {
            return ClientError::Http {
                status: 401,
                message,
            };
        }

        if let Some(raw) = self.ephemeral.get(LOGIN_TIME_KEY) {
            if let Ok(login_ms) = raw.parse::<i64>() {
                if within_grace_period(login_ms, Utc::now().timestamp_millis()) {
                    tracing::warn!(path, "401 during post-login grace period, ignoring logout");
                    return ClientError::Http {
                        status: 401,
                        message,
                    };
                }
            }
        }

        self.durable.remove(TOKEN_KEY);
        self.ephemeral.remove(LOGIN_TIME_KEY);
        self.redirect.redirect_to_login();
        ClientError::SessionExpired
    }
}

fn within_grace_period(login_ms: i64, now_ms: i64) -> bool {
    now_ms - login_ms < LOGIN_GRACE_PERIOD_MS
}

/// Failed responses carry a FastAPI-style `{"detail": ...}` body; fall
/// back to the HTTP status reason when no message can be extracted.
fn error_message(status: StatusCode, body: Option<serde_json::Value>) -> String {
    body.as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("message")))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}
