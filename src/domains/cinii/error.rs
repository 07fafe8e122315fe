//! CiNii search error types.

use thiserror::Error;

use crate::domains::tools::ToolError;

/// Message returned to clients when the upstream payload cannot be parsed.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse CiNii XML response";

/// Errors that can occur during a CiNii search.
///
/// Every failure inside [`super::CiniiClient::search`] is one of these; raw
/// `reqwest` and `quick_xml` errors never leave the client.
#[derive(Debug, Error)]
pub enum CiniiError {
    /// No API credential was supplied.
    #[error("CII_APPID environment variable is required for CiNii API access")]
    MissingCredential,

    /// The API answered with a non-success status.
    #[error("CiNii API returned status {status}: {body}")]
    Transport { status: u16, body: String },

    /// The API answered with a payload that is not well-formed XML.
    ///
    /// `reason` is for logs only.
    #[error("{}", PARSE_FAILURE_MESSAGE)]
    Parse { reason: String },

    /// Any other failure (connection, timeout, body read).
    #[error("{0}")]
    Internal(String),
}

impl CiniiError {
    /// Create a new parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

/// The request URL carries the application ID in its query string, so it
/// is stripped before the error becomes client-visible text.
impl From<reqwest::Error> for CiniiError {
    fn from(err: reqwest::Error) -> Self {
        CiniiError::Internal(err.without_url().to_string())
    }
}

impl From<CiniiError> for ToolError {
    fn from(err: CiniiError) -> Self {
        match err {
            CiniiError::Transport { status, body } => ToolError::execution_failed(status, body),
            CiniiError::Parse { .. } => ToolError::execution_failed(500, PARSE_FAILURE_MESSAGE),
            other => ToolError::execution_failed(500, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_keeps_upstream_status_and_body() {
        let err: ToolError = CiniiError::Transport {
            status: 503,
            body: "rate limited".to_string(),
        }
        .into();
        assert_eq!(err.status_code().as_u16(), 503);
        assert_eq!(err.detail(), serde_json::json!("rate limited"));
    }

    #[test]
    fn test_parse_hides_reason() {
        let err = CiniiError::parse("unexpected end of file at byte 12");
        assert_eq!(err.to_string(), PARSE_FAILURE_MESSAGE);

        let tool_err: ToolError = err.into();
        assert_eq!(tool_err.status_code().as_u16(), 500);
        assert_eq!(tool_err.detail(), serde_json::json!(PARSE_FAILURE_MESSAGE));
    }

    #[test]
    fn test_internal_uses_message() {
        let tool_err: ToolError = CiniiError::Internal("connection refused".to_string()).into();
        assert_eq!(tool_err.status_code().as_u16(), 500);
        assert_eq!(tool_err.detail(), serde_json::json!("connection refused"));
    }
}
