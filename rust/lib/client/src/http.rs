use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::{ApiError, ApiRequest, ApiResponse, Gateway, NoAuth, TokenSource};

/// Name of the backend's session cookie.
const SESSION_COOKIE: &str = "sessionid";

/// reqwest-backed [`Gateway`] for a single backend origin.
///
/// Cookies set by the backend are kept in a jar and sent back on every
/// request, so a logged-in session is forwarded automatically.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    auth_scheme: String,
}

impl HttpGateway {
    pub fn builder(base_url: impl Into<String>) -> HttpGatewayBuilder {
        HttpGatewayBuilder {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source: Arc::new(NoAuth),
            auth_scheme: "Token".to_string(),
            session_cookie: None,
            timeout: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = self.token_source.token().await? {
            builder = builder.header(AUTHORIZATION, format!("{} {}", self.auth_scheme, token));
        }

        debug!(method = %request.method, url = %url, "sending request");
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        debug!(method = %request.method, url = %url, status, "response received");
        Ok(ApiResponse { status, body })
    }
}

/// Builder for [`HttpGateway`].
pub struct HttpGatewayBuilder {
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    auth_scheme: String,
    session_cookie: Option<String>,
    timeout: Option<Duration>,
}

impl HttpGatewayBuilder {
    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = source;
        self
    }

    /// Authorization scheme placed before the token (default `Token`).
    pub fn auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    /// Seed the cookie jar with an existing backend session.
    pub fn session_cookie(mut self, value: impl Into<String>) -> Self {
        self.session_cookie = Some(value.into());
        self
    }

    /// Per-request timeout. A timed-out request is a transport failure.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpGateway, ApiError> {
        let origin: reqwest::Url = self
            .base_url
            .parse()
            .map_err(|e| ApiError::Config(format!("invalid base url '{}': {}", self.base_url, e)))?;

        let jar = Arc::new(Jar::default());
        if let Some(session) = &self.session_cookie {
            jar.add_cookie_str(&format!("{}={}; Path=/", SESSION_COOKIE, session), &origin);
        }

        let mut http = reqwest::Client::builder().cookie_provider(jar);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(HttpGateway {
            http: http.build()?,
            base_url: self.base_url,
            token_source: self.token_source,
            auth_scheme: self.auth_scheme,
        })
    }
}
