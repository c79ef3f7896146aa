//! Link checker
//!
//! One HEAD request per link (GET when the server refuses HEAD), mapped to a
//! [`LinkResult`] through the closed [`ProbeOutcome`] type.

use crate::state::{LinkResult, ProbeOutcome};
use crate::url::classify_link;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

/// Checks links against the shared concurrency limiter
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    limiter: Arc<Semaphore>,
    origin: String,
    timeout: Duration,
}

impl LinkChecker {
    /// Creates a checker for links found on pages of `origin`
    ///
    /// `timeout` must match the client's request timeout; it is reported as
    /// the response time of timed-out checks.
    pub fn new(client: Client, limiter: Arc<Semaphore>, origin: String, timeout: Duration) -> Self {
        Self {
            client,
            limiter,
            origin,
            timeout,
        }
    }

    /// Checks one edge and returns its result
    ///
    /// Never fails: timeouts and transport errors become `error`-severity
    /// results.
    pub async fn check(&self, source: &Url, target: &Url) -> LinkResult {
        let link_type = classify_link(target, &self.origin);
        let outcome = self.probe(target).await;

        let result = LinkResult::from_outcome(
            source.as_str(),
            target.as_str(),
            link_type,
            outcome,
            self.timeout,
        );

        debug!(
            "Checked {} [{}] -> {} ({:?}, {:.3}s)",
            result.target_url, result.link_type, result.severity, result.status_code, result.response_time
        );

        result
    }

    /// Issues the HEAD request, falling back to GET once
    ///
    /// The limiter slot is held for both requests and released when the
    /// permit drops, whichever way this returns. The reported time is that
    /// of the request whose status is reported.
    async fn probe(&self, url: &Url) -> ProbeOutcome {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => return ProbeOutcome::Transport("concurrency limiter closed".to_string()),
        };

        let start = Instant::now();
        let status = match self.client.head(url.clone()).send().await {
            Ok(response) => response.status(),
            Err(e) => return ProbeOutcome::from_error(&e),
        };

        if !rejects_head(status) {
            return ProbeOutcome::Response {
                status_code: status.as_u16(),
                elapsed: start.elapsed(),
            };
        }

        debug!("HEAD rejected with {} for {}, retrying with GET", status, url);
        let start = Instant::now();
        match self.client.get(url.clone()).send().await {
            Ok(response) => ProbeOutcome::Response {
                status_code: response.status().as_u16(),
                elapsed: start.elapsed(),
            },
            Err(e) => ProbeOutcome::from_error(&e),
        }
    }
}

/// Statuses meaning "this server does not do HEAD"
fn rejects_head(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::build_http_client;
    use crate::state::{LinkType, Severity};
    use crate::url::extract_origin;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker_for(server: &MockServer, timeout: Duration) -> LinkChecker {
        let base = Url::parse(&server.uri()).unwrap();
        let client = build_http_client("test-bot/1.0", timeout).unwrap();
        LinkChecker::new(
            client,
            Arc::new(Semaphore::new(4)),
            extract_origin(&base).unwrap(),
            timeout,
        )
    }

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[test]
    fn test_rejects_head() {
        assert!(rejects_head(StatusCode::METHOD_NOT_ALLOWED));
        assert!(rejects_head(StatusCode::NOT_IMPLEMENTED));
        assert!(!rejects_head(StatusCode::NOT_FOUND));
        assert!(!rejects_head(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_check_success() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(5));
        let result = checker.check(&url(&server, "/"), &url(&server, "/ok")).await;

        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.severity, Severity::Success);
        assert_eq!(result.link_type, LinkType::Page);
        assert_eq!(result.error_message, None);
        assert!(result.response_time >= 0.0);
    }

    #[tokio::test]
    async fn test_check_not_found_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(5));
        let result = checker
            .check(&url(&server, "/"), &url(&server, "/missing"))
            .await;

        assert_eq!(result.status_code, Some(404));
        assert_eq!(result.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_head_not_allowed_falls_back_to_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/no-head"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/no-head"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(5));
        let result = checker
            .check(&url(&server, "/"), &url(&server, "/no-head"))
            .await;

        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_fallback_reports_get_time_only() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow-head"))
            .respond_with(ResponseTemplate::new(405).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow-head"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let result = checker
            .check(&url(&server, "/"), &url(&server, "/slow-head"))
            .await;

        // Only the GET counts, so six seconds in total is still fast enough
        assert_eq!(result.status_code, Some(200));
        assert!(result.response_time >= 3.0);
        assert!(result.response_time < 5.0);
        assert_eq!(result.severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_head_server_error_does_not_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(5));
        let result = checker
            .check(&url(&server, "/"), &url(&server, "/broken"))
            .await;

        assert_eq!(result.status_code, Some(500));
        assert_eq!(result.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(5));
        let result = checker.check(&url(&server, "/"), &url(&server, "/old")).await;

        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.target_url, url(&server, "/old").to_string());
    }

    #[tokio::test]
    async fn test_timeout_reports_configured_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let timeout = Duration::from_millis(200);
        let checker = checker_for(&server, timeout);
        let result = checker.check(&url(&server, "/"), &url(&server, "/slow")).await;

        assert_eq!(result.status_code, None);
        assert_eq!(result.severity, Severity::Error);
        assert_eq!(result.error_message.as_deref(), Some("Request timeout"));
        assert_eq!(result.response_time, timeout.as_secs_f64());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let uri = {
            let server = MockServer::builder().start().await;
            server.uri()
        };
        let target = Url::parse(&format!("{}/x", uri)).unwrap();
        let client = build_http_client("test-bot/1.0", Duration::from_secs(2)).unwrap();
        let checker = LinkChecker::new(
            client,
            Arc::new(Semaphore::new(1)),
            extract_origin(&target).unwrap(),
            Duration::from_secs(2),
        );

        let result = checker.check(&target, &target).await;

        assert_eq!(result.status_code, None);
        assert_eq!(result.severity, Severity::Error);
        assert_eq!(result.response_time, 0.0);
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_limiter_slot_released_on_every_path() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let limiter = Arc::new(Semaphore::new(1));
        let timeout = Duration::from_millis(200);
        let client = build_http_client("test-bot/1.0", timeout).unwrap();
        let origin = extract_origin(&url(&server, "/")).unwrap();
        let checker = LinkChecker::new(client, limiter.clone(), origin, timeout);

        checker.check(&url(&server, "/"), &url(&server, "/slow")).await;
        checker.check(&url(&server, "/"), &url(&server, "/ok")).await;

        assert_eq!(limiter.available_permits(), 1);
    }
}
