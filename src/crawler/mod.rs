//! Crawler module for breadth-first crawling and link checking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of same-origin pages
//! - HTML parsing and link extraction
//! - Link checking with HEAD-then-GET fallback
//! - Frontier, visited set and depth bookkeeping
//! - Layer-by-layer crawl coordination
//! - Stratified sampling of crawled pages for vitals measurement

mod checker;
mod coordinator;
mod fetcher;
mod parser;
mod sampling;
mod scheduler;

pub use checker::LinkChecker;
pub use coordinator::{CancelHandle, CrawlOptions, SiteCrawler};
pub use fetcher::{build_http_client, FetchResult, PageFetcher, MAX_REDIRECTS};
pub use parser::extract_links;
pub use sampling::{select_sample, select_sample_with};
pub use scheduler::{CrawlState, Layer};

use crate::state::LinkResult;
use crate::SiteHealthError;

/// Runs a complete crawl with the given options
///
/// Convenience wrapper for callers that only need the results.
///
/// # Returns
///
/// * `Ok(Vec<LinkResult>)` - Every checked link
/// * `Err(SiteHealthError)` - Invalid options or a fatal crawl fault
pub async fn crawl(options: CrawlOptions) -> Result<Vec<LinkResult>, SiteHealthError> {
    SiteCrawler::new(options)?.crawl().await
}
