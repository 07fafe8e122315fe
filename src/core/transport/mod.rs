//! Transport layer for the server.
//!
//! The server is exposed over HTTP only: every tool is a `POST` route and
//! the liveness and health probes are `GET` routes. This module owns the
//! listener, the middleware stack and the non-tool routes.

mod config;
mod error;
pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, build_router};
