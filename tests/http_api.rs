//! End-to-end tests of the HTTP surface.
//!
//! The full router is driven in-process; the CiNii API is replaced by a
//! mockito server.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cinii_mcp_server::core::config::CiniiConfig;
use cinii_mcp_server::core::transport::build_router;
use cinii_mcp_server::core::{Config, McpServer};
use cinii_mcp_server::domains::cinii::CiniiClient;
use http_body_util::BodyExt;
use mockito::Matcher;
use serde_json::{Value, json};
use tower::ServiceExt;

const FIXTURE: &str = include_str!("fixtures/articles.xml");

fn router_with_upstream(base_url: String) -> Router {
    let settings = CiniiConfig {
        base_url,
        ..CiniiConfig::default()
    };
    let client = CiniiClient::new("integration-appid", &settings).unwrap();
    let server = McpServer::with_cinii_client(Config::default(), Some(client)).unwrap();
    build_router(&server)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn search_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/cinii/search_articles")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_search_returns_parsed_page() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", "/opensearch/articles")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "deep learning".into()),
            Matcher::UrlEncoded("count".into(), "10".into()),
            Matcher::UrlEncoded("start".into(), "1".into()),
            Matcher::UrlEncoded("format".into(), "atom".into()),
            Matcher::UrlEncoded("appid".into(), "integration-appid".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/atom+xml; charset=UTF-8")
        .with_body(FIXTURE)
        .create_async()
        .await;

    let router = router_with_upstream(format!("{}/opensearch/articles", upstream.url()));
    let (status, body) = send(router, search_request(json!({ "query": "deep learning" }))).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 1234);
    assert_eq!(body["start_index"], 1);
    assert_eq!(body["items_per_page"], 3);

    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0]["author"], "山田 太郎, 佐藤 花子");
    assert_eq!(articles[0]["publication_year"], "2021");
    assert_eq!(articles[2]["author"], Value::Null);
    assert_eq!(articles[2]["publication_year"], Value::Null);
}

#[tokio::test]
async fn test_out_of_range_never_reaches_upstream() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (status, body) = send(
        router_with_upstream(upstream.url()),
        search_request(json!({ "query": "q", "count": 500, "start": 0 })),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let locs: Vec<Value> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["loc"].clone())
        .collect();
    assert_eq!(locs, vec![json!(["body", "count"]), json!(["body", "start"])]);
}

#[tokio::test]
async fn test_missing_query_is_unprocessable() {
    let (status, body) = send(
        router_with_upstream("http://127.0.0.1:9".to_string()),
        search_request(json!({ "count": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "query"]));
    assert_eq!(body["detail"][0]["type"], "missing");
}

#[tokio::test]
async fn test_unreachable_upstream_does_not_expose_credential() {
    let settings = CiniiConfig {
        base_url: "http://127.0.0.1:9/opensearch/articles".to_string(),
        ..CiniiConfig::default()
    };
    let client = CiniiClient::new("SECRET-APPID-123", &settings).unwrap();
    let server = McpServer::with_cinii_client(Config::default(), Some(client)).unwrap();

    let (status, body) = send(build_router(&server), search_request(json!({ "query": "q" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.is_empty());
    assert!(!detail.contains("SECRET-APPID-123"), "credential leaked: {}", detail);
    assert!(!detail.contains("appid="), "query string leaked: {}", detail);
}

#[tokio::test]
async fn test_every_invalid_field_is_reported() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (status, body) = send(
        router_with_upstream(upstream.url()),
        search_request(json!({ "query": 5, "count": 500, "start": 0 })),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let mut found: Vec<(String, String)> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| {
            let field = v["loc"][1].as_str().unwrap().to_string();
            (field, v["type"].as_str().unwrap().to_string())
        })
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            ("count".to_string(), "less_than_equal".to_string()),
            ("query".to_string(), "string_type".to_string()),
            ("start".to_string(), "greater_than_equal".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_upstream_status_and_body_forwarded() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("GET", Matcher::Any)
        .with_status(503)
        .with_body("rate limited")
        .create_async()
        .await;

    let (status, body) = send(
        router_with_upstream(upstream.url()),
        search_request(json!({ "query": "q" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "detail": "rate limited" }));
}

#[tokio::test]
async fn test_malformed_upstream_payload_is_generic_error() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body("<feed><entry>unterminated")
        .create_async()
        .await;

    let (status, body) = send(
        router_with_upstream(upstream.url()),
        search_request(json!({ "query": "q" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Failed to parse CiNii XML response" }));
}

#[tokio::test]
async fn test_missing_credential_disables_search_only() {
    let server = McpServer::new(Config::default()).unwrap();

    let (status, _) = send(build_router(&server), search_request(json!({ "query": "q" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let root = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(build_router(&server), root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "CiNii MCP Server is running");

    let listing = Request::builder()
        .uri("/cinii/tools")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(build_router(&server), listing).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tools"], json!([]));
}

#[tokio::test]
async fn test_tool_listing_describes_search() {
    let listing = Request::builder()
        .uri("/cinii/tools")
        .body(Body::empty())
        .unwrap();
    let router = router_with_upstream("http://127.0.0.1:9".to_string());
    let (status, body) = send(router, listing).await;

    assert_eq!(status, StatusCode::OK);
    let tool = &body["tools"][0];
    assert_eq!(tool["name"], "search_articles");
    assert_eq!(tool["description"], "Search academic articles on CiNii");
    assert_eq!(tool["callingConvention"], "suspending");
    assert!(tool["outputSchema"]["properties"]["articles"].is_object());
}
