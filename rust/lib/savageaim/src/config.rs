//! Client configuration.
//!
//! Reads/writes `~/.savageaim/config.toml`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use savageaim_client::{ApiError, HttpGateway, StaticToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin (e.g. "https://savageaim.com").
    pub server: String,

    /// Prefix of every API endpoint.
    pub api_prefix: String,

    /// Value of the backend's `sessionid` cookie, copied from a browser.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_cookie: String,

    /// API token from the settings page. Sent as `Authorization: Token ...`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_token: String,

    /// Size of the notification window.
    pub notification_limit: u32,

    pub request_timeout_secs: u64,

    pub login_path: String,
    pub logout_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "http://localhost:8000".to_string(),
            api_prefix: "/backend/api".to_string(),
            session_cookie: String::new(),
            api_token: String::new(),
            notification_limit: 20,
            request_timeout_secs: 30,
            login_path: "/backend/accounts/discord/login/".to_string(),
            logout_path: "/backend/logout/".to_string(),
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.savageaim/config.toml.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".savageaim").join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            api_prefix: self.api_prefix.trim_end_matches('/').to_string(),
            login_path: self.login_path.clone(),
            logout_path: self.logout_path.clone(),
            notification_limit: self.notification_limit,
        }
    }

    /// Build the HTTP gateway described by this config.
    pub fn gateway(&self) -> Result<HttpGateway, ApiError> {
        let mut builder = HttpGateway::builder(&self.server)
            .timeout(Duration::from_secs(self.request_timeout_secs));
        if !self.session_cookie.is_empty() {
            builder = builder.session_cookie(&self.session_cookie);
        }
        if !self.api_token.is_empty() {
            builder = builder.token_source(Arc::new(StaticToken::new(&self.api_token)));
        }
        builder.build()
    }
}

/// Resolved endpoint paths, relative to the backend origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_prefix: String,
    pub login_path: String,
    pub logout_path: String,
    pub notification_limit: u32,
}

impl Endpoints {
    /// `api("team/")` -> `/backend/api/team/`.
    pub fn api(&self, path: &str) -> String {
        format!("{}/{}", self.api_prefix, path.trim_start_matches('/'))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        ClientConfig::default().endpoints()
    }
}
