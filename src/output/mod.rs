//! Output module for generating crawl reports
//!
//! This module handles:
//! - Loading a stored crawl and its link results for reporting
//! - Rendering the terminal report
//! - Rendering and writing the markdown report

mod markdown;
mod terminal;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use terminal::format_terminal_report;

use crate::state::{LinkResult, LinkType, Severity};
use crate::storage::{CrawlSummary, Storage, StorageError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors listed in a report before the rest are elided
pub const MAX_LISTED_ERRORS: usize = 20;

/// Warnings listed in a report before the rest are elided
pub const MAX_LISTED_WARNINGS: usize = 10;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Crawl {0} not found")]
    CrawlNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A stored crawl with everything a report shows
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub summary: CrawlSummary,

    /// Every link result, errors first
    pub results: Vec<LinkResult>,
}

impl CrawlReport {
    pub fn errors(&self) -> impl Iterator<Item = &LinkResult> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LinkResult> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &LinkResult> {
        self.results.iter().filter(move |r| r.severity == severity)
    }

    /// Number of results per link type, in link type order
    pub fn counts_by_type(&self) -> BTreeMap<LinkType, usize> {
        let mut counts = BTreeMap::new();
        for result in &self.results {
            *counts.entry(result.link_type).or_insert(0) += 1;
        }
        counts
    }

    /// Duration in seconds, once the crawl has finished
    pub fn duration_secs(&self) -> Option<f64> {
        self.summary
            .duration()
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
    }
}

/// Loads a crawl report from storage
///
/// # Arguments
///
/// * `storage` - The storage backend containing crawl data
/// * `crawl_id` - The crawl to report on
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Summary plus all link results
/// * `Err(OutputError)` - Unknown crawl or storage failure
pub fn load_report(storage: &dyn Storage, crawl_id: i64) -> OutputResult<CrawlReport> {
    let summary = storage
        .get_crawl_summary(crawl_id)?
        .ok_or(OutputError::CrawlNotFound(crawl_id))?;
    let results = storage.get_link_results(crawl_id, None)?;

    Ok(CrawlReport { summary, results })
}
