//! Tool-specific error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::validation::FieldViolation;

/// Errors that can occur while dispatching a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The request body failed the input gate.
    #[error("Invalid arguments: {}", summarize(.0))]
    InvalidArguments(Vec<FieldViolation>),

    /// The handler failed and classified the failure itself.
    #[error("Execution failed ({status}): {detail}")]
    ExecutionFailed { status: u16, detail: String },

    /// The handler returned a value that failed the output gate.
    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.loc.join("."), v.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "execution failed" error with an explicit status.
    pub fn execution_failed(status: u16, detail: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            status,
            detail: detail.into(),
        }
    }

    /// Create a new "invalid output" error.
    pub fn invalid_output(msg: impl Into<String>) -> Self {
        Self::InvalidOutput(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status this error is reported with.
    ///
    /// Handler-supplied codes outside the valid HTTP range map to 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidArguments(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ExecutionFailed { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::InvalidOutput(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `detail` payload of the error body.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            Self::InvalidArguments(violations) => serde_json::json!(violations),
            Self::ExecutionFailed { detail, .. } => serde_json::json!(detail),
            Self::NotFound(name) => serde_json::json!(format!("Unknown tool: {}", name)),
            Self::InvalidOutput(_) => serde_json::json!("Response validation failed"),
            Self::Internal(msg) => serde_json::json!(msg),
        }
    }
}

impl IntoResponse for ToolError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail() });
        (self.status_code(), Json(body)).into_response()
    }
}
