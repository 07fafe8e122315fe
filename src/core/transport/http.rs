//! HTTP transport implementation.
//!
//! Serves the tool routes produced by the registry, plus a liveness probe at
//! `/` and a health check at `/health`.

use axum::{Json, Router, response::IntoResponse, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::McpServer;
use crate::domains::tools::{LISTING_SEGMENT, build_tool_router};

/// Message returned by the liveness probe.
pub const LIVENESS_MESSAGE: &str = "CiNii MCP Server is running";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Build the complete application router for a server, without middleware.
pub fn build_router(server: &McpServer) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .merge(build_tool_router(server.registry()))
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until Ctrl-C.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        info!("Starting transport: {}", self.config.description());

        let mut app = build_router(&server).layer(TraceLayer::new_for_http());

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {}", addr);
        info!("  → Liveness: GET /");
        info!("  → Health:   GET /health");
        info!(
            "  → Tools:    GET {}",
            server.registry().route_path(LISTING_SEGMENT)
        );
        if server.registry().tools().is_empty() {
            warn!("No tools registered; only the probes are available");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Root handler - liveness probe.
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": LIVENESS_MESSAGE }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
