//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::{LinkResult, Severity};
use crate::storage::{CrawlStatus, CrawlSummary};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Crawl not found: {0}")]
    CrawlNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed to record crawls and
/// report on them later.
pub trait Storage {
    // ===== Crawl Management =====

    /// Creates a new crawl in the `running` state
    ///
    /// # Arguments
    ///
    /// * `start_url` - The seed URL
    /// * `max_depth` - The depth limit the crawl runs with
    ///
    /// # Returns
    ///
    /// The ID of the newly created crawl
    fn create_crawl(&mut self, start_url: &str, max_depth: u32) -> StorageResult<i64>;

    /// Marks a crawl as finished and records its totals
    ///
    /// Sets `completed_at` to now. Fails with `CrawlNotFound` for an unknown id.
    fn complete_crawl(
        &mut self,
        crawl_id: i64,
        total_pages: usize,
        total_links: usize,
        status: CrawlStatus,
    ) -> StorageResult<()>;

    /// Gets a crawl with its error and warning counts
    fn get_crawl_summary(&self, crawl_id: i64) -> StorageResult<Option<CrawlSummary>>;

    /// Lists the most recent crawls, newest first
    fn list_crawls(&self, limit: usize) -> StorageResult<Vec<CrawlSummary>>;

    // ===== Link Results =====

    /// Saves link results in a single transaction
    ///
    /// Every row gets the same check timestamp.
    fn save_link_results(&mut self, crawl_id: i64, results: &[LinkResult]) -> StorageResult<()>;

    /// Gets the link results of a crawl
    ///
    /// With a severity filter, results are in insertion order. Without one,
    /// errors come first, then warnings, then successes.
    fn get_link_results(
        &self,
        crawl_id: i64,
        severity: Option<Severity>,
    ) -> StorageResult<Vec<LinkResult>>;
}
