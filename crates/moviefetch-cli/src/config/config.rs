//! `AppConfig` struct, TOML loading and endpoint resolution.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use moviefetch_api::fetch::FetchConfig;
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Catalog endpoint configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL that `home` and `movie/{id}` are resolved against.
    /// Should end with `/`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Connect timeout in milliseconds (default: 2000).
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    /// Read timeout in milliseconds (default: 2000).
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Transport settings for `FetchTask`.
    #[must_use]
    pub fn fetch_config(&self) -> FetchConfig {
        let mut builder = FetchConfig::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(ms) = self.api.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.api.read_timeout_ms {
            builder = builder.read_timeout(Duration::from_millis(ms));
        }
        builder.build()
    }

    /// Resolves `path` against `api.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is unset or is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<String> {
        let base = self
            .api
            .base_url
            .as_deref()
            .context("no --url given and api.base_url is not set in config")?;
        let base = Url::parse(base).with_context(|| format!("invalid api.base_url: {base}"))?;
        let url = base
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        Ok(String::from(url))
    }
}
