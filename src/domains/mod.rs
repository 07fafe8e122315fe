//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the tool registry and dispatcher, plus tool definitions
//! - **cinii**: the CiNii OpenSearch client and its payload parser

pub mod cinii;
pub mod tools;
