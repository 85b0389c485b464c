//! HTTP client for the browser automation service.
//!
//! Every browse goes through the same loop: check `/health`, then POST
//! `/browse`. Transient failures (service down, upstream 5xx, connection
//! faults) are retried with a fixed backoff; anything else fails the call
//! immediately. The retry decision itself is a pure function so the policy
//! can be tested without a server.

use {
    std::time::Duration,
    async_trait::async_trait,
    glimpse_config::BrowseClientConfig,
    glimpse_protocol::{BROWSE_ENDPOINT, BrowseRequest, BrowseResult, HEALTH_ENDPOINT},
    tracing::{info, warn},
};

/// Chat-facing text when the service never came up.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Browser service not available. \
     Please make sure the browser service is running with: glimpse browser";

/// Failure modes of a browse call, from the gateway's point of view.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The health check failed or the service could not be reached at all.
    #[error("browser service unavailable")]
    Unavailable,
    /// The service accepted the call but answered with a non-success status.
    #[error("browser service returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The browse call itself failed at the connection level.
    #[error("connection to browser service failed: {0}")]
    Transport(String),
    /// Anything else, e.g. a success response with an undecodable body.
    #[error("{0}")]
    Unexpected(String),
}

impl ClientError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }

    /// Text surfaced to the chat user when the browse ultimately fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable => SERVICE_UNAVAILABLE_MESSAGE.to_owned(),
            Self::Upstream { body, .. } => format!("Error from browser service: {body}"),
            Self::Transport(error) => format!("Error connecting to browser service: {error}"),
            Self::Unexpected(error) => format!("Error browsing website: {error}"),
        }
    }
}

// ── Retry policy ─────────────────────────────────────────────────────────

/// Position within the bounded retry loop.
#[derive(Debug, Clone, Copy)]
struct RetryState {
    attempt: u32,
    max_attempts: u32,
}

impl RetryState {
    fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_retries.saturating_add(1),
        }
    }

    fn is_last(self) -> bool {
        self.attempt + 1 >= self.max_attempts
    }

    fn advance(self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum RetryDecision {
    RetryAfterBackoff,
    GiveUp,
}

fn decide(state: RetryState, error: &ClientError) -> RetryDecision {
    if !error.is_retryable() || state.is_last() {
        RetryDecision::GiveUp
    } else {
        RetryDecision::RetryAfterBackoff
    }
}

// ── Client ───────────────────────────────────────────────────────────────

/// Anything that can run a visual walkthrough of a URL.
///
/// The gateway talks to the automation service through this trait so that
/// tests and offline demos can substitute a stand-in.
#[async_trait]
pub trait VisualBrowser: Send + Sync {
    async fn browse(&self, url: &str) -> Result<BrowseResult, ClientError>;
}

/// Client for the browser automation service.
pub struct BrowseClient {
    http: reqwest::Client,
    endpoint: String,
    health_timeout: Duration,
    browse_timeout: Duration,
    backoff: Duration,
    max_retries: u32,
}

impl BrowseClient {
    pub fn from_config(config: &BrowseClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
            browse_timeout: Duration::from_secs(config.browse_timeout_secs),
            backoff: Duration::from_secs(config.retry_backoff_secs),
            max_retries: config.max_retries,
        }
    }

    async fn service_healthy(&self) -> bool {
        let url = format!("{}{HEALTH_ENDPOINT}", self.endpoint);
        match self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(status = %response.status(), "browser service health check failed");
                false
            },
            Err(error) => {
                warn!(%error, "browser service unreachable");
                false
            },
        }
    }

    /// One health-gated browse attempt.
    async fn attempt(&self, url: &str) -> Result<BrowseResult, ClientError> {
        if !self.service_healthy().await {
            return Err(ClientError::Unavailable);
        }

        let endpoint = format!("{}{BROWSE_ENDPOINT}", self.endpoint);
        let request = BrowseRequest {
            url: url.to_owned(),
        };
        let response = self
            .http
            .post(&endpoint)
            .timeout(self.browse_timeout)
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upstream { status, body });
        }

        response
            .json::<BrowseResult>()
            .await
            .map_err(|error| ClientError::Unexpected(error.to_string()))
    }
}

fn classify_send_error(error: reqwest::Error) -> ClientError {
    if error.is_connect() || error.is_timeout() {
        ClientError::Transport(error.to_string())
    } else {
        ClientError::Unexpected(error.to_string())
    }
}

#[async_trait]
impl VisualBrowser for BrowseClient {
    async fn browse(&self, url: &str) -> Result<BrowseResult, ClientError> {
        let url = normalize_url(url);
        let mut state = RetryState::new(self.max_retries);
        loop {
            match self.attempt(&url).await {
                Ok(result) => {
                    info!(%url, steps = result.screenshots.len(), "browse succeeded");
                    return Ok(result);
                },
                Err(error) => match decide(state, &error) {
                    RetryDecision::GiveUp => {
                        warn!(%url, %error, attempt = state.attempt, "browse failed");
                        return Err(error);
                    },
                    RetryDecision::RetryAfterBackoff => {
                        warn!(
                            %url,
                            %error,
                            attempt = state.attempt,
                            "browse attempt failed, backing off"
                        );
                        state = state.advance();
                        tokio::time::sleep(self.backoff).await;
                    },
                },
            }
        }
    }
}

/// Prefixes `https://` when the URL carries no recognized scheme.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

// ── Stand-in implementation ──────────────────────────────────────────────

/// Browser stand-in that fabricates a one-step walkthrough.
pub struct NoopBrowser;

#[async_trait]
impl VisualBrowser for NoopBrowser {
    async fn browse(&self, url: &str) -> Result<BrowseResult, ClientError> {
        let url = normalize_url(url);
        let mut trace = glimpse_protocol::StepTrace::new();
        trace.push(
            "screenshots/visual_0/step_0_0.png",
            format!("Initial page load of {url}"),
            None,
            glimpse_protocol::InteractionKind::PageLoad,
        );
        Ok(trace.into_result("Example Domain", url, "", 0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_config(endpoint: String) -> BrowseClientConfig {
        BrowseClientConfig {
            endpoint,
            health_timeout_secs: 5,
            browse_timeout_secs: 5,
            retry_backoff_secs: 0,
            max_retries: 2,
        }
    }

    #[test]
    fn retry_policy_exhausts_then_gives_up() {
        let mut state = RetryState::new(2);
        let error = ClientError::Unavailable;
        assert_eq!(decide(state, &error), RetryDecision::RetryAfterBackoff);
        state = state.advance();
        assert_eq!(decide(state, &error), RetryDecision::RetryAfterBackoff);
        state = state.advance();
        assert_eq!(decide(state, &error), RetryDecision::GiveUp);
    }

    #[test]
    fn unexpected_faults_never_retry() {
        let state = RetryState::new(5);
        let error = ClientError::Unexpected("bad payload".into());
        assert_eq!(decide(state, &error), RetryDecision::GiveUp);
    }

    #[test]
    fn transport_and_upstream_faults_are_retryable() {
        let state = RetryState::new(2);
        let transport = ClientError::Transport("connection reset".into());
        let upstream = ClientError::Upstream {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "bad gateway".into(),
        };
        assert_eq!(decide(state, &transport), RetryDecision::RetryAfterBackoff);
        assert_eq!(decide(state, &upstream), RetryDecision::RetryAfterBackoff);
    }

    #[test]
    fn zero_retries_still_allows_one_attempt() {
        let state = RetryState::new(0);
        assert!(state.is_last());
        assert_eq!(
            decide(state, &ClientError::Unavailable),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn scheme_is_defaulted_only_when_missing() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[tokio::test]
    async fn exhausted_health_checks_return_the_unavailable_error() {
        let mut server = mockito::Server::new_async().await;
        let health = server
            .mock("GET", "/health")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;
        let browse = server
            .mock("POST", "/browse")
            .expect(0)
            .create_async()
            .await;

        let client = BrowseClient::from_config(&test_config(server.url()));
        let error = client.browse("https://example.com").await.unwrap_err();

        assert!(matches!(error, ClientError::Unavailable));
        health.assert_async().await;
        browse.assert_async().await;
    }

    #[tokio::test]
    async fn connection_refused_service_is_unavailable() {
        // Grab a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = test_config(format!("http://127.0.0.1:{port}"));
        config.max_retries = 0;
        let client = BrowseClient::from_config(&config);

        let error = client.browse("https://example.com").await.unwrap_err();
        assert!(matches!(error, ClientError::Unavailable));
    }

    #[tokio::test]
    async fn upstream_errors_retry_then_carry_the_body() {
        let mut server = mockito::Server::new_async().await;
        let health = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"healthy"}"#)
            .expect(3)
            .create_async()
            .await;
        let browse = server
            .mock("POST", "/browse")
            .with_status(500)
            .with_body("browser exploded")
            .expect(3)
            .create_async()
            .await;

        let client = BrowseClient::from_config(&test_config(server.url()));
        let error = client.browse("https://example.com").await.unwrap_err();

        match error {
            ClientError::Upstream { status, body } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "browser exploded");
            },
            other => panic!("expected upstream error, got {other:?}"),
        }
        health.assert_async().await;
        browse.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_success_bodies_are_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let health = server
            .mock("GET", "/health")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let browse = server
            .mock("POST", "/browse")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .expect(1)
            .create_async()
            .await;

        let client = BrowseClient::from_config(&test_config(server.url()));
        let error = client.browse("https://example.com").await.unwrap_err();

        assert!(matches!(error, ClientError::Unexpected(_)));
        health.assert_async().await;
        browse.assert_async().await;
    }

    #[tokio::test]
    async fn bare_hosts_are_sent_with_https() {
        let mut server = mockito::Server::new_async().await;
        let _health = server
            .mock("GET", "/health")
            .with_status(200)
            .create_async()
            .await;
        let browse = server
            .mock("POST", "/browse")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "url": "https://example.com"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "title": "Example Domain",
                    "url": "https://example.com",
                    "screenshots": [],
                    "descriptions": [],
                    "cursor_positions": [],
                    "interactions": [],
                    "content_preview": "",
                    "timestamp": 0
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = BrowseClient::from_config(&test_config(server.url()));
        let result = client.browse("example.com").await.unwrap();

        assert_eq!(result.title, "Example Domain");
        browse.assert_async().await;
    }

    #[tokio::test]
    async fn noop_browser_reports_a_single_page_load() {
        let result = NoopBrowser.browse("example.com").await.unwrap();
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.screenshots.len(), 1);
        assert_eq!(result.descriptions.len(), 1);
        assert_eq!(result.cursor_positions.len(), 1);
        assert_eq!(result.interactions.len(), 1);
    }
}
