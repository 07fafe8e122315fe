//! Request and response models for CiNii article search.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::Validate;

/// Largest page size accepted by the search tool.
pub const MAX_COUNT: i64 = 200;
/// Page size used when the request omits `count`.
pub const DEFAULT_COUNT: i64 = 10;
/// First result index; also the smallest accepted `start`.
pub const DEFAULT_START: i64 = 1;

fn default_count() -> i64 {
    DEFAULT_COUNT
}

fn default_start() -> i64 {
    DEFAULT_START
}

/// Parameters for an article search.
///
/// The `range` attributes end up in the input schema, which is what the
/// input gate enforces; they must agree with [`MAX_COUNT`] and
/// [`DEFAULT_START`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchArticlesParams {
    /// Search term.
    #[schemars(description = "Search term")]
    pub query: String,

    /// Number of results (default: 10, max: 200).
    #[schemars(description = "Number of results", range(max = 200))]
    #[serde(default = "default_count")]
    pub count: i64,

    /// Offset for pagination (default: 1, min: 1).
    #[schemars(description = "Offset for pagination", range(min = 1))]
    #[serde(default = "default_start")]
    pub start: i64,
}

impl Validate for SearchArticlesParams {}

/// One article entry. Every field is optional and serialized as `null`
/// when the upstream entry does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Article {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Author names joined with `", "`.
    pub author: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page_start: Option<String>,
    pub page_end: Option<String>,
    /// Leading year component of the publication date.
    pub publication_year: Option<String>,
    pub description: Option<String>,
    /// CiNii Research persistent identifier.
    pub crid: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleSearchResult {
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub start_index: u64,
    pub items_per_page: u64,
}

impl Validate for ArticleSearchResult {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::schema_violations;
    use serde_json::{Value, json};

    fn params_schema() -> Value {
        schemars::schema_for!(SearchArticlesParams).to_value()
    }

    #[test]
    fn test_defaults_applied() {
        let p: SearchArticlesParams = serde_json::from_value(json!({ "query": "rust" })).unwrap();
        assert_eq!(p.count, 10);
        assert_eq!(p.start, 1);
    }

    #[test]
    fn test_schema_bounds_match_constants() {
        let schema = params_schema();
        assert_eq!(schema["properties"]["count"]["maximum"].as_i64(), Some(MAX_COUNT));
        assert_eq!(schema["properties"]["start"]["minimum"].as_i64(), Some(DEFAULT_START));
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let value = json!({ "query": "q", "count": 200, "start": 1 });
        assert!(schema_violations(&value, &params_schema()).is_empty());
    }

    #[test]
    fn test_out_of_range_values_reported_together() {
        let value = json!({ "query": "q", "count": 201, "start": 0 });
        let violations = schema_violations(&value, &params_schema());
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].loc, vec!["body", "count"]);
        assert_eq!(violations[1].loc, vec!["body", "start"]);
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let json = serde_json::to_value(Article::default()).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 11);
        assert!(json["crid"].is_null());
        assert!(json["publication_year"].is_null());
    }
}
