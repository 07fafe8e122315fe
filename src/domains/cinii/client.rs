//! CiNii OpenSearch client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::error::CiniiError;
use super::models::ArticleSearchResult;
use super::parser::parse_search_response;
use crate::core::config::CiniiConfig;

/// Client for the CiNii OpenSearch article API.
///
/// Holds the application ID and one connection pool. `reqwest::Client` is
/// reference-counted internally, so clones share the pool.
#[derive(Clone)]
pub struct CiniiClient {
    appid: String,
    base_url: String,
    client: Client,
}

impl CiniiClient {
    /// Create a client with the given application ID.
    ///
    /// An empty ID is rejected with [`CiniiError::MissingCredential`]. Any
    /// non-empty value, whitespace included, is sent upstream as given.
    pub fn new(appid: impl Into<String>, settings: &CiniiConfig) -> Result<Self, CiniiError> {
        let appid = appid.into();
        if appid.is_empty() {
            return Err(CiniiError::MissingCredential);
        }

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| CiniiError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            appid,
            base_url: settings.base_url.clone(),
            client,
        })
    }

    /// The endpoint searches are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search articles.
    ///
    /// `count` and `start` are passed through unchanged; range checks belong
    /// to the caller.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn search(
        &self,
        query: &str,
        count: i64,
        start: i64,
    ) -> Result<ArticleSearchResult, CiniiError> {
        info!("Searching CiNii articles");

        let params = [
            ("q", query.to_string()),
            ("count", count.to_string()),
            ("start", start.to_string()),
            ("format", "atom".to_string()),
            ("appid", self.appid.clone()),
        ];

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!(status = status.as_u16(), "CiNii API returned an error status");
            return Err(CiniiError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.bytes().await?;
        let result = parse_search_response(&payload).inspect_err(|e| {
            if let CiniiError::Parse { reason } = e {
                warn!("Failed to parse CiNii response: {}", reason);
            }
        })?;

        debug!(
            articles = result.articles.len(),
            total_results = result.total_results,
            "CiNii search completed"
        );
        Ok(result)
    }
}

/// Custom Debug implementation to redact the application ID from logs.
impl std::fmt::Debug for CiniiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CiniiClient")
            .field("appid", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const FIXTURE: &str = include_str!("../../../tests/fixtures/articles.xml");

    fn settings(base_url: String) -> CiniiConfig {
        CiniiConfig {
            base_url,
            ..CiniiConfig::default()
        }
    }

    #[test]
    fn test_empty_credential_rejected() {
        let err = CiniiClient::new("", &CiniiConfig::default()).unwrap_err();
        assert!(matches!(err, CiniiError::MissingCredential));
    }

    #[test]
    fn test_whitespace_credential_accepted() {
        assert!(CiniiClient::new("  ", &CiniiConfig::default()).is_ok());
    }

    #[test]
    fn test_debug_redacts_appid() {
        let client = CiniiClient::new("secret-appid", &CiniiConfig::default()).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("secret-appid"));
    }

    #[tokio::test]
    async fn test_search_sends_parameters_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/opensearch/articles")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "深層学習".into()),
                Matcher::UrlEncoded("count".into(), "3".into()),
                Matcher::UrlEncoded("start".into(), "1".into()),
                Matcher::UrlEncoded("format".into(), "atom".into()),
                Matcher::UrlEncoded("appid".into(), "test-appid".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FIXTURE)
            .create_async()
            .await;

        let client = CiniiClient::new(
            "test-appid",
            &settings(format!("{}/opensearch/articles", server.url())),
        )
        .unwrap();
        let result = client.search("深層学習", 3, 1).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.articles.len(), 3);
        assert_eq!(result.total_results, 1234);
    }

    #[tokio::test]
    async fn test_error_status_forwarded_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opensearch/articles")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = CiniiClient::new(
            "test-appid",
            &settings(format!("{}/opensearch/articles", server.url())),
        )
        .unwrap();
        let err = client.search("q", 10, 1).await.unwrap_err();

        match err {
            CiniiError::Transport { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opensearch/articles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<feed><entry></feed>")
            .create_async()
            .await;

        let client = CiniiClient::new(
            "test-appid",
            &settings(format!("{}/opensearch/articles", server.url())),
        )
        .unwrap();
        let err = client.search("q", 10, 1).await.unwrap_err();

        assert!(matches!(err, CiniiError::Parse { .. }));
        assert_eq!(err.to_string(), "Failed to parse CiNii XML response");
    }

    #[tokio::test]
    async fn test_connection_failure_is_internal_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let client = CiniiClient::new(
            "SECRET-APPID-123",
            &settings("http://127.0.0.1:9/opensearch/articles".to_string()),
        )
        .unwrap();
        let err = client.search("q", 10, 1).await.unwrap_err();
        assert!(matches!(err, CiniiError::Internal(ref msg) if !msg.is_empty()));

        let message = err.to_string();
        assert!(!message.contains("SECRET-APPID-123"), "credential leaked: {}", message);
        assert!(!message.contains("appid="), "query string leaked: {}", message);
    }
}
