//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_SPIDER_*)
//! 2. The bare SPIDER_API_KEY environment variable
//! 3. TOML config file (if MCP_SPIDER_CONFIG_FILE set)
//! 4. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Default Spider API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.spider.cloud";

/// Default User-Agent sent with every Spider request.
pub const DEFAULT_USER_AGENT: &str = "mcp-spider/0.1";

/// Application configuration with layered loading.
///
/// Loaded once at startup and handed to the HTTP client; nothing reads the
/// environment after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Spider API key.
    ///
    /// Set via MCP_SPIDER_API_KEY or SPIDER_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Spider API.
    ///
    /// Set via MCP_SPIDER_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_SPIDER_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP timeout in milliseconds.
    ///
    /// Bounds connecting and each wait for body data; a streamed crawl may run
    /// longer as long as records keep arriving.
    /// Set via MCP_SPIDER_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether tools request JSONL streaming when the call does not say.
    ///
    /// Set via MCP_SPIDER_STREAM environment variable.
    #[serde(default = "default_true")]
    pub stream: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            stream: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_SPIDER_`
    /// 2. `SPIDER_API_KEY`, mapped onto `api_key`
    /// 3. TOML file from `MCP_SPIDER_CONFIG_FILE` (if set)
    /// 4. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_SPIDER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment
            .merge(Env::raw().only(&["SPIDER_API_KEY"]).map(|_| "api_key".into()))
            .merge(
                Env::prefixed("MCP_SPIDER_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the API key or explain how to set it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no key is configured or it is blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "api_key".into(),
                hint: "Set SPIDER_API_KEY or MCP_SPIDER_API_KEY environment variable".into(),
            })
    }
}
