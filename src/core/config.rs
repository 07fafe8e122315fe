//! Configuration management for the server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};

/// Production CiNii OpenSearch article endpoint.
pub const DEFAULT_CINII_BASE_URL: &str = "https://ci.nii.ac.jp/opensearch/articles";

/// Main configuration structure for the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub transport: HttpConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Outbound CiNii API settings.
    pub cinii: CiniiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server; also the route prefix for its tools.
    pub name: String,

    /// Human-readable description, shown in the tool listing.
    pub description: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// CiNii application ID. When unset, the CiNii tools are disabled.
    pub cinii_appid: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "cinii_appid",
                &self.cinii_appid.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Outbound CiNii API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiniiConfig {
    /// Search endpoint URL.
    pub base_url: String,

    /// Total request timeout, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout, in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent header sent upstream.
    pub user_agent: String,
}

impl Default for CiniiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CINII_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "cinii".to_string(),
                description: "MCP server providing access to CiNii articles".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            credentials: CredentialsConfig::default(),
            cinii: CiniiConfig::default(),
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
    /// A `.env` file in the working directory is loaded first, if present.
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_HTTP_*`); CiNii settings use `CII_APPID` and
    /// the `CINII_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        // Runs before logging is initialized; the disabled-tool warning is
        // emitted later, when the tools are built. An empty value counts as
        // unset.
        config.credentials.cinii_appid = std::env::var("CII_APPID")
            .ok()
            .filter(|appid| !appid.is_empty());

        if let Ok(base_url) = std::env::var("CINII_BASE_URL") {
            config.cinii.base_url = base_url;
        }

        if let Some(secs) = env_u64("CINII_TIMEOUT_SECS") {
            config.cinii.timeout_secs = secs;
        }

        if let Some(secs) = env_u64("CINII_CONNECT_TIMEOUT_SECS") {
            config.cinii.connect_timeout_secs = secs;
        }

        config
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
