//! Tools domain module.
//!
//! This module handles all tool-related functionality: turning plain
//! functions into schema-validated HTTP endpoints.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `tool.rs` - The `Tool` type and its gate/handler/gate dispatch
//! - `validation.rs` - Field-level constraint reporting
//! - `registry.rs` - Central tool registry and dispatch by name
//! - `router.rs` - Per-tool axum routes
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define input/output types implementing `Validate` and `JsonSchema`
//! 3. Build it with `Tool::blocking` or `Tool::suspending`
//! 4. Return it from `definitions::all_tools()`
//!
//! Routes are derived from the registry; no router changes are needed.

pub mod definitions;
mod error;
mod registry;
pub mod router;
mod tool;
mod validation;

pub use error::ToolError;
pub use registry::{LISTING_SEGMENT, ToolRegistry};
pub use router::build_tool_router;
pub use tool::{CallingConvention, Tool, ToolResult};
pub use validation::{FieldViolation, Validate, schema_violations};
