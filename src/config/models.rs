// src/config/models.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use url::Url;

/// Environment variable that overrides `api.base_url` when set.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    /// When present, the bundled dev backend is started before probing.
    #[serde(default)]
    pub backend: Option<BackendConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Origin prefix for all request paths. Empty means paths resolve
    /// through the dev rewrite rule instead.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Dev-time routing: paths under `prefix` go to `target` while
    /// `base_url` is empty.
    #[serde(default)]
    pub rewrite: Option<RewriteConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteConfig {
    #[serde(default = "default_rewrite_prefix")]
    pub prefix: String,
    #[serde(default = "default_rewrite_target")]
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_addr")]
    pub addr: SocketAddr,

    /// Status string the backend reports. Anything other than "ok" renders
    /// the probe disconnected.
    #[serde(default = "default_backend_status")]
    pub status: String,
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

fn default_rewrite_prefix() -> String {
    "/api".to_string()
}

fn default_rewrite_target() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_backend_addr() -> SocketAddr {
    ([127, 0, 0, 1], 8000).into()
}

fn default_backend_status() -> String {
    "ok".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            health_path: default_health_path(),
            rewrite: None,
        }
    }
}

impl Config {
    /// Apply environment overrides before validation.
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            self.api.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate()
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.is_empty() {
            Url::parse(&self.base_url).context("api.base_url is not a valid URL")?;
        } else if let Some(rewrite) = &self.rewrite {
            Url::parse(&rewrite.target).context("api.rewrite.target is not a valid URL")?;
            if !rewrite.prefix.starts_with('/') {
                bail!("api.rewrite.prefix must start with '/'");
            }
        }

        if !self.health_path.starts_with('/') {
            bail!("api.health_path must start with '/'");
        }

        Ok(())
    }
}
