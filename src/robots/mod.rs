//! Robots.txt handling module
//!
//! The crawler only asks one yes/no question before enqueueing a page:
//! [`PermissionOracle::is_allowed`]. The default oracle is the origin's
//! robots.txt, fetched once per crawl.

mod parser;

pub use parser::ParsedRobots;

use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

/// Decides whether a page may be crawled
pub trait PermissionOracle: Send + Sync {
    fn is_allowed(&self, url: &Url) -> bool;
}

/// Fetches robots.txt for the origin of `origin_url`
///
/// The request goes through the shared concurrency limiter. A missing file
/// (any status other than 200) or a failed request yields [`ParsedRobots::allow_all`].
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `limiter` - The crawl-wide concurrency limiter
/// * `origin_url` - Any URL on the origin
/// * `user_agent` - The user agent string
pub async fn fetch_robots(
    client: &Client,
    limiter: &Semaphore,
    origin_url: &Url,
    user_agent: &str,
) -> ParsedRobots {
    let robots_url = match origin_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot build robots.txt URL for {}: {}", origin_url, e);
            return ParsedRobots::allow_all();
        }
    };

    let Ok(_permit) = limiter.acquire().await else {
        return ParsedRobots::allow_all();
    };

    let response = match client.get(robots_url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if response.status() != StatusCode::OK {
        debug!("{} returned {}, allowing all", robots_url, response.status());
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(content) => {
            debug!("Loaded {} ({} bytes)", robots_url, content.len());
            ParsedRobots::from_content(&content, user_agent)
        }
        Err(e) => {
            warn!("Failed to read {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}

/// Wraps the fetched robots.txt for sharing with layer tasks
pub async fn robots_oracle(
    client: &Client,
    limiter: &Semaphore,
    origin_url: &Url,
    user_agent: &str,
) -> Arc<dyn PermissionOracle> {
    Arc::new(fetch_robots(client, limiter, origin_url, user_agent).await)
}
