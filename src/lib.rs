//! CiNii tool server library.
//!
//! Exposes the CiNii OpenSearch article API as schema-validated HTTP tool
//! endpoints.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, server composition, HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: generic tool registry and dispatcher, plus tool definitions
//!   - **cinii**: CiNii OpenSearch client and Atom payload parser
//!
//! # Example
//!
//! ```rust,no_run
//! use cinii_mcp_server::core::{Config, HttpTransport, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     HttpTransport::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
