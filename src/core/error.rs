//! Error types and handling for the server.
//!
//! This module defines a unified error type that can represent errors from
//! the domains during startup, providing consistent error handling across
//! the application.

use thiserror::Error;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the CiNii domain.
    #[error("CiNii error: {0}")]
    Cinii(#[from] crate::domains::cinii::CiniiError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
