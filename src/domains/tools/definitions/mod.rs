//! Tool definitions module.
//!
//! Each tool is defined in its own file. `all_tools` is the single place
//! where the set of exposed tools is decided.

pub mod search_articles;

pub use search_articles::SearchArticlesTool;

use std::sync::Arc;

use tracing::warn;

use super::Tool;
use crate::domains::cinii::CiniiClient;

/// Build every tool whose dependencies are available.
///
/// The search tool is only built when a CiNii client exists; without one
/// it is left out and its route is never mounted.
pub fn all_tools(cinii: Option<CiniiClient>) -> Vec<Tool> {
    let mut tools = Vec::new();

    match cinii {
        Some(client) => tools.push(SearchArticlesTool::create_tool(Arc::new(client))),
        None => warn!(
            "CII_APPID environment variable not set. CiNii tools will be disabled."
        ),
    }

    tools
}
