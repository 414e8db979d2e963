//! Configuration management for the bridge.
//!
//! Values come from defaults, overridden by `MCP_*` environment variables
//! (a `.env` file is honoured).

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::spec::HttpMethod;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default downstream API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1818";

/// Default spec document location.
pub const DEFAULT_SPEC_SOURCE: &str = "swagger.yaml";

/// Default timeout for live API calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Downstream API and spec settings.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Settings for the described API and its spec document.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Initial base URL for live calls.
    pub base_url: String,

    /// Optional initial bearer credential.
    pub token: Option<String>,

    /// Primary spec location (path, file:// or http(s) URL).
    pub spec_source: String,

    /// Tried at startup when the primary source fails.
    pub spec_fallback: Option<String>,

    /// Timeout for live calls, in seconds.
    pub timeout_secs: u64,

    /// Methods that produce operations and generated tools.
    pub recognized_methods: Vec<HttpMethod>,
}

/// Custom Debug implementation to redact the token from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("spec_source", &self.spec_source)
            .field("spec_fallback", &self.spec_fallback)
            .field("timeout_secs", &self.timeout_secs)
            .field("recognized_methods", &self.recognized_methods)
            .finish()
    }
}

impl ApiConfig {
    /// Timeout for live calls.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject values no API call could work with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("API timeout must be at least one second"));
        }
        if self.recognized_methods.is_empty() {
            return Err(Error::config("at least one HTTP method must be recognized"));
        }
        if self.spec_source.trim().is_empty() {
            return Err(Error::config("spec source must not be empty"));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            spec_source: DEFAULT_SPEC_SOURCE.to_string(),
            spec_fallback: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            recognized_methods: HttpMethod::DEFAULT_RECOGNIZED.to_vec(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "openapi-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_API_BASE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(flag) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = !matches!(flag.to_lowercase().as_str(), "false" | "0");
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("MCP_API_BASE_URL") {
            config.api.base_url = base_url;
        }

        match std::env::var("MCP_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => {
                config.api.token = Some(token);
                info!("Initial bearer token loaded from environment");
            }
            _ => {}
        }

        if let Ok(source) = std::env::var("MCP_SPEC_SOURCE") {
            config.api.spec_source = source;
        }

        if let Ok(fallback) = std::env::var("MCP_SPEC_FALLBACK") {
            config.api.spec_fallback = Some(fallback).filter(|f| !f.trim().is_empty());
        }

        if let Ok(timeout) = std::env::var("MCP_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.api.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_API_TIMEOUT_SECS '{}', using {}s",
                    timeout, config.api.timeout_secs
                ),
            }
        }

        if let Ok(methods) = std::env::var("MCP_RECOGNIZED_METHODS") {
            let parsed = parse_methods(&methods);
            if parsed.is_empty() {
                warn!(
                    "MCP_RECOGNIZED_METHODS '{}' names no known method, keeping defaults",
                    methods
                );
            } else {
                config.api.recognized_methods = parsed;
            }
        }

        config
    }
}

/// Parse a comma-separated method list, skipping unknown entries.
fn parse_methods(list: &str) -> Vec<HttpMethod> {
    let mut methods = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match HttpMethod::parse(name) {
            Some(method) if !methods.contains(&method) => methods.push(method),
            Some(_) => {}
            None => warn!("Unknown HTTP method '{}' in MCP_RECOGNIZED_METHODS", name),
        }
    }
    methods
}
