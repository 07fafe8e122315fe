//! Server composition and lifecycle.
//!
//! `McpServer` is the composition root: it turns configuration into an
//! optional CiNii client, hands that client to the tool definitions, and
//! freezes the resulting tools in a registry.
//!
//! A missing application ID is not fatal. The search tool is simply not
//! built, so its route never exists, while the probes keep answering.

use std::sync::Arc;

use tracing::{info, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::cinii::{CiniiClient, CiniiError};
use crate::domains::tools::{ToolRegistry, definitions};

/// The server: configuration plus the frozen tool registry.
#[derive(Debug, Clone)]
pub struct McpServer {
    config: Arc<Config>,
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a server, building the CiNii client from the configured
    /// credentials when they are present.
    pub fn new(config: Config) -> Result<Self> {
        let cinii = Self::build_cinii_client(&config)?;
        Self::with_cinii_client(config, cinii)
    }

    /// Create a server around an explicitly supplied (or absent) client.
    pub fn with_cinii_client(config: Config, cinii: Option<CiniiClient>) -> Result<Self> {
        let tools = definitions::all_tools(cinii);
        let registry = ToolRegistry::new(
            config.server.name.clone(),
            config.server.description.clone(),
            tools,
        )?;

        info!(
            "Server initialized with {} tool(s): {:?}",
            registry.tool_names().len(),
            registry.tool_names()
        );

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        })
    }

    /// `None` when no usable credential is configured; other client
    /// construction failures are errors.
    fn build_cinii_client(config: &Config) -> Result<Option<CiniiClient>> {
        let Some(appid) = config.credentials.cinii_appid.as_deref() else {
            return Ok(None);
        };

        match CiniiClient::new(appid, &config.cinii) {
            Ok(client) => {
                info!("CiNii client targeting {}", client.base_url());
                Ok(Some(client))
            }
            Err(CiniiError::MissingCredential) => {
                warn!("CII_APPID is empty; CiNii tools will be disabled");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }
}
