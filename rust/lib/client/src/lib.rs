//! Savage Aim HTTP gateway.
//!
//! Every remote call made by the client goes through a [`Gateway`]. The
//! gateway only fails on transport problems; HTTP status handling is left
//! to the caller, with `fetch` and `execute` on `dyn Gateway` mapping
//! non-success statuses to [`ApiError::Server`].
//!
//! # Usage
//!
//! ```ignore
//! use savageaim_client::{ApiRequest, Gateway, HttpGateway};
//!
//! let gw: Arc<dyn Gateway> = Arc::new(
//!     HttpGateway::builder("http://localhost:8000")
//!         .session_cookie("abc123")
//!         .build()?,
//! );
//! let teams: Vec<Team> = gw.fetch(ApiRequest::get("/backend/api/team/")).await?;
//! ```

mod http;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use http::{HttpGateway, HttpGatewayBuilder};
pub use reqwest::Method;

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("transport: {0}")]
    Transport(String),

    #[error("decode: {0}")]
    Decode(String),

    #[error("config: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of a server-side rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Access denied. Expected for anonymous or low-privilege sessions.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Pluggable token provider. Called before every API request.
///
/// Returns `Ok(None)` to skip the Authorization header (cookie-only or
/// anonymous sessions).
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// No token; rely on the session cookie, if any.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Static API token (copied from the user's settings page).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

// ── Request / Response ──────────────────────────────────────────────

/// A request against the backend origin. `path` is absolute (`/backend/...`).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Raw response: status code plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// Map a non-success status to `ApiError::Server`.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Server {
                status: self.status,
                message: self.text(),
            })
        }
    }
}

// ── Gateway ─────────────────────────────────────────────────────────

/// Remote access gateway to the backend origin.
///
/// Implementations forward session credentials on every request and only
/// return `Err` for transport failures (unreachable, timeout, TLS).
#[async_trait::async_trait]
pub trait Gateway: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

impl dyn Gateway {
    /// Send and decode a JSON body, mapping non-success statuses to errors.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.error_for_status()?.json()
    }

    /// Send a write, ignoring the body of a successful response.
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await?.error_for_status().map(|_| ())
    }
}
