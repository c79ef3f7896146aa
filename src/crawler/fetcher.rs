//! HTTP fetcher implementation
//!
//! This module handles the page side of the crawl:
//! - Building the shared HTTP client with the crawler's user agent
//! - GET requests for same-origin pages
//! - Content-Type gating (only HTML is parsed)
//! - Error classification into a closed [`FetchResult`]

use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use url::Url;

/// Redirect hops followed before a request is treated as failed
pub const MAX_REDIRECTS: usize = 10;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// The server answered with a status >= 400
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Time until the response headers arrived
        elapsed: Duration,
    },

    /// The request exceeded the configured timeout
    Timeout,

    /// Network error (connection refused, DNS, TLS, ...)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed automatically (up to [`MAX_REDIRECTS`] hops) and
/// every request carries `timeout`.
///
/// # Example
///
/// ```no_run
/// use site_health::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("site-health/0.1.0 (+https://example.com)", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches same-origin pages through the shared concurrency limiter
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    limiter: Arc<Semaphore>,
}

impl PageFetcher {
    pub fn new(client: Client, limiter: Arc<Semaphore>) -> Self {
        Self { client, limiter }
    }

    /// Fetches a page and decides whether it can be parsed
    ///
    /// # Request Flow
    ///
    /// 1. Acquire a limiter slot (held until the body is read)
    /// 2. GET with redirect following
    /// 3. Status >= 400 → `HttpError`
    /// 4. Content-Type without `text/html` → `ContentMismatch`
    /// 5. Read the body → `Success`
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return FetchResult::NetworkError {
                    error: "concurrency limiter closed".to_string(),
                }
            }
        };

        let start = Instant::now();
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let status = response.status();
        if status.as_u16() >= 400 {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
                elapsed: start.elapsed(),
            };
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return FetchResult::ContentMismatch { content_type };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success {
                status_code: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => classify_error(&e),
        }
    }
}

fn classify_error(error: &reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::Timeout
    } else {
        FetchResult::NetworkError {
            error: error.to_string(),
        }
    }
}
