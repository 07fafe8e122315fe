//! CiNii article search tool.
//!
//! Wraps [`CiniiClient::search`] as a suspending tool. Range checks on
//! `count` and `start` happen in the input gate, so no request leaves the
//! process with out-of-range values.

use std::sync::Arc;

use tracing::info;

use crate::domains::cinii::{ArticleSearchResult, CiniiClient, SearchArticlesParams};
use crate::domains::tools::{Tool, ToolResult};

/// CiNii Article Search Tool implementation.
#[derive(Debug, Clone)]
pub struct SearchArticlesTool;

impl SearchArticlesTool {
    /// Tool name as registered; also the route segment.
    pub const NAME: &'static str = "search_articles";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search academic articles on CiNii";

    /// Execute the tool logic.
    pub async fn execute(
        client: &CiniiClient,
        params: SearchArticlesParams,
    ) -> ToolResult<ArticleSearchResult> {
        info!(
            "Searching articles matching: {} (count={}, start={})",
            params.query, params.count, params.start
        );

        let result = client
            .search(&params.query, params.count, params.start)
            .await?;

        info!(
            "Found {} of {} articles",
            result.articles.len(),
            result.total_results
        );
        Ok(result)
    }

    /// Create the tool, sharing one client across all calls.
    pub fn create_tool(client: Arc<CiniiClient>) -> Tool {
        Tool::suspending(
            Self::NAME,
            Self::DESCRIPTION,
            move |params: SearchArticlesParams| {
                let client = Arc::clone(&client);
                async move { Self::execute(&client, params).await }
            },
        )
    }
}
