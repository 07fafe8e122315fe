//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, validated once at startup
//! - Dispatch of tool calls by name
//! - Tool metadata for listing

use serde_json::Value;
use tracing::{debug, warn};

use super::error::ToolError;
use super::tool::{Tool, ToolResult};
use crate::core::error::{Error, Result};

/// Path segment reserved for the tool listing route.
pub const LISTING_SEGMENT: &str = "tools";

/// Tool registry - owns every tool exposed by one server.
///
/// The tool list is fixed at construction; tools are never added, replaced
/// or removed afterwards.
#[derive(Debug)]
pub struct ToolRegistry {
    server_name: String,
    description: String,
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Create a registry from a list of tools.
    ///
    /// Fails with a configuration error if the server name or any tool name
    /// is not a plain path segment, or if two tools share a name.
    pub fn new(
        server_name: impl Into<String>,
        description: impl Into<String>,
        tools: Vec<Tool>,
    ) -> Result<Self> {
        let server_name = server_name.into();
        if !is_path_segment(&server_name) {
            return Err(Error::config(format!(
                "Invalid server name '{}': expected letters, digits, '_' or '-'",
                server_name
            )));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(tools.len());
        for tool in &tools {
            let name = tool.name();
            if !is_path_segment(name) {
                return Err(Error::config(format!(
                    "Invalid tool name '{}': expected letters, digits, '_' or '-'",
                    name
                )));
            }
            if name == LISTING_SEGMENT {
                return Err(Error::config(format!(
                    "Tool name '{}' is reserved for the tool listing",
                    name
                )));
            }
            if seen.contains(&name) {
                return Err(Error::config(format!("Duplicate tool name '{}'", name)));
            }
            seen.push(name);
            debug!(tool = name, convention = ?tool.convention(), "Registered tool");
        }

        Ok(Self {
            server_name,
            description: description.into(),
            tools,
        })
    }

    /// The server name, used as the route prefix.
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All registered tools, in registration order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Get all tools as listing metadata.
    pub fn get_all_tools(&self) -> Vec<Value> {
        self.tools.iter().map(Tool::descriptor).collect()
    }

    /// Route path of a tool: `/<server-name>/<tool-name>`.
    pub fn route_path(&self, tool_name: &str) -> String {
        format!("/{}/{}", self.server_name, tool_name)
    }

    /// Dispatch a tool call to the appropriate handler.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        match self.get(name) {
            Some(tool) => tool.call(arguments).await,
            None => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
