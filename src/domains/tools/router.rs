//! Tool Router - builds the axum routes from the registry.
//!
//! Every registered tool gets its own `POST /<server-name>/<tool-name>`
//! route. The raw body is parsed here; everything past JSON syntax is the
//! tool's own input gate.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::error::ToolError;
use super::registry::{LISTING_SEGMENT, ToolRegistry};
use super::tool::ToolResult;
use super::validation::FieldViolation;

/// Build the router with one route per registered tool plus the listing.
pub fn build_tool_router(registry: Arc<ToolRegistry>) -> Router {
    let mut router = Router::new().route(
        &registry.route_path(LISTING_SEGMENT),
        get(handle_tools_list),
    );

    for name in registry.tool_names() {
        let path = registry.route_path(name);
        let name = name.to_string();
        info!("  → Tool: POST {}", path);

        router = router.route(
            &path,
            post(
                move |State(registry): State<Arc<ToolRegistry>>, body: Bytes| {
                    let name = name.clone();
                    async move { handle_tool_call(&registry, &name, body).await }
                },
            ),
        );
    }

    router.with_state(registry)
}

/// Handle tool listing requests.
async fn handle_tools_list(State(registry): State<Arc<ToolRegistry>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "server": registry.server_name(),
        "description": registry.description(),
        "tools": registry.get_all_tools(),
    }))
}

/// Handle a single tool call.
#[instrument(skip(registry, body), fields(body_len = body.len()))]
async fn handle_tool_call(registry: &ToolRegistry, name: &str, body: Bytes) -> Response {
    match dispatch(registry, name, &body).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            warn!(status = %e.status_code(), "Tool call failed: {}", e);
            e.into_response()
        }
    }
}

async fn dispatch(registry: &ToolRegistry, name: &str, body: &[u8]) -> ToolResult<Value> {
    let arguments = parse_body(body)?;
    registry.call_tool(name, arguments).await
}

/// Parse the request body as JSON.
fn parse_body(body: &[u8]) -> ToolResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ToolError::InvalidArguments(vec![FieldViolation::body(
            "Field required",
            "missing",
        )]));
    }

    serde_json::from_slice(body).map_err(|e| {
        ToolError::InvalidArguments(vec![FieldViolation::body(
            format!("JSON decode error: {}", e),
            "json_invalid",
        )])
    })
}
