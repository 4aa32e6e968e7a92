use crate::error::{Result, SolveError};
use crate::request::SearchRequest;
use crate::response::SearchResponse;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/solve";
pub const DEFAULT_USER_AGENT: &str = "wikirace/0.1 (https://github.com/trapdoorsec/wikirace)";

// Longest slice of an error body carried into logs and errors
const ERROR_BODY_EXCERPT: usize = 200;

/// Transport settings for a [`SolveClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub endpoint: String,
    /// `None` waits for the backend indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveClient {
    client: Client,
    endpoint: Url,
}

impl SolveClient {
    pub fn new() -> Result<Self> {
        Self::from_options(&ClientOptions::default())
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Self::from_options(&ClientOptions {
            endpoint: endpoint.to_string(),
            ..ClientOptions::default()
        })
    }

    pub fn from_options(options: &ClientOptions) -> Result<Self> {
        let endpoint = parse_endpoint(&options.endpoint)?;

        let mut builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(secs) = options.timeout_secs {
            builder = builder
                .timeout(Duration::from_secs(secs))
                .connect_timeout(Duration::from_secs(secs.div_ceil(2)));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue one POST for `request`. Never retried.
    pub async fn solve(&self, request: &SearchRequest) -> Result<SearchResponse> {
        info!(
            "Solving {} -> {} with {}",
            request.start(),
            request.end(),
            request.algorithm()
        );
        debug!("POST {}", self.endpoint);

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(request.to_multipart())
            .send()
            .await?;
        let status = response.status();
        debug!("{} answered {} in {:?}", self.endpoint, status, started.elapsed());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = excerpt(&body);
            warn!("Solve endpoint returned {}: {}", status, body);
            return Err(SolveError::Status { status, body });
        }

        let body = response.bytes().await?;
        let parsed = SearchResponse::from_slice(&body)?;
        debug!(
            "Parsed solution with {} nodes ({} articles checked)",
            parsed.solution.len(),
            parsed.articles_checked
        );
        Ok(parsed)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| SolveError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SolveError::InvalidEndpoint(format!(
            "{}: unsupported scheme '{}'",
            endpoint, other
        ))),
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(ERROR_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, method, path},
    };

    fn solve_url(server: &MockServer) -> String {
        format!("{}/solve", server.uri())
    }

    fn ok_body() -> serde_json::Value {
        serde_json::json!({
            "solution": ["A", "B", "C"],
            "articlesChecked": 42,
            "pathLength": 2,
            "timeTaken": "5ms"
        })
    }

    #[tokio::test]
    async fn test_posts_multipart_fields_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/solve"))
            .and(body_string_contains("name=\"start\""))
            .and(body_string_contains("name=\"end\""))
            .and(body_string_contains("name=\"algo\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SolveClient::with_endpoint(&solve_url(&mock_server)).unwrap();
        let request = SearchRequest::new("Rust", "Crab", "bfs").unwrap();
        let response = client.solve(&request).await.unwrap();

        assert_eq!(response.articles_checked, 42);

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);

        let content_type = received[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains("Rust"));
        assert!(body.contains("Crab"));
        assert!(body.contains("bfs"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_parsed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/solve"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":"Both start and end titles are required"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = SolveClient::with_endpoint(&solve_url(&mock_server)).unwrap();
        let request = SearchRequest::new("Rust", "Crab", "bfs").unwrap();
        let err = client.solve(&request).await.unwrap_err();

        match err {
            SolveError::Status { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert!(body.contains("required"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/solve"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "solution": ["A"] })),
            )
            .mount(&mock_server)
            .await;

        let client = SolveClient::with_endpoint(&solve_url(&mock_server)).unwrap();
        let request = SearchRequest::new("A", "A", "bfs").unwrap();
        let err = client.solve(&request).await.unwrap_err();
        assert!(matches!(err, SolveError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) is not expected to be listening
        let client = SolveClient::from_options(&ClientOptions {
            endpoint: "http://127.0.0.1:9/solve".to_string(),
            timeout_secs: Some(2),
            ..ClientOptions::default()
        })
        .unwrap();
        let request = SearchRequest::new("A", "B", "bfs").unwrap();
        let err = client.solve(&request).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_default_endpoint() {
        let client = SolveClient::new().unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8080/solve");
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = SolveClient::with_endpoint("ftp://localhost/solve").unwrap_err();
        assert!(matches!(err, SolveError::InvalidEndpoint(_)));

        let err = SolveClient::with_endpoint("not a url").unwrap_err();
        assert!(matches!(err, SolveError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert_eq!(short.len(), ERROR_BODY_EXCERPT + 3);
        assert!(short.ends_with("..."));
        assert_eq!(excerpt("  short  "), "short");
    }
}
