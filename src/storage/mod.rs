//! Storage module for persisting crawl data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Crawl lifecycle rows (running → completed | failed)
//! - Link result persistence and retrieval
//! - Aggregated crawl summaries for reporting

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::LinkResult;
use crate::SiteHealthError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SiteHealthError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SiteHealthError> {
    SqliteStorage::new(path)
}

/// Stores the results of a finished crawl and marks it `completed`
///
/// If either write fails the crawl is marked `failed` with zero totals and
/// the original error is returned, so no crawl is left `running`.
pub fn finish_crawl(
    storage: &mut dyn Storage,
    crawl_id: i64,
    pages_crawled: usize,
    results: &[LinkResult],
) -> StorageResult<()> {
    let stored = storage
        .save_link_results(crawl_id, results)
        .and_then(|()| {
            storage.complete_crawl(crawl_id, pages_crawled, results.len(), CrawlStatus::Completed)
        });

    if let Err(e) = stored {
        tracing::error!("Failed to store results of crawl {}: {}", crawl_id, e);
        if let Err(mark) = storage.complete_crawl(crawl_id, 0, 0, CrawlStatus::Failed) {
            tracing::error!("Failed to mark crawl {} as failed: {}", crawl_id, mark);
        }
        return Err(e);
    }

    Ok(())
}

/// A persisted crawl with aggregated result counts
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub id: i64,
    pub start_url: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub max_depth: u32,
    pub total_pages: usize,
    pub total_links: usize,
    pub errors: usize,
    pub warnings: usize,
    pub status: CrawlStatus,
}

impl CrawlSummary {
    /// Wall-clock duration, once the crawl has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    /// Links that were neither errors nor warnings
    pub fn successes(&self) -> usize {
        self.total_links
            .saturating_sub(self.errors)
            .saturating_sub(self.warnings)
    }
}

/// Status of a persisted crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    Running,
    Completed,
    Failed,
}

impl CrawlStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
