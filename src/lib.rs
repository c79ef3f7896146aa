//! Site-Health: a breadth-first site crawler and link checker
//!
//! This crate crawls a website layer by layer from a seed URL, validates every
//! discovered link (internal and external), and records one [`LinkResult`] per
//! checked edge for later reporting.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;
pub mod vitals;

use thiserror::Error;

/// Main error type for Site-Health operations
#[derive(Debug, Error)]
pub enum SiteHealthError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawler has already run; create a new crawler for another crawl")]
    AlreadyCrawled,

    #[error("Crawl aborted: {0}")]
    SchedulerFatal(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No start URL given on the command line or in the config file")]
    MissingStartUrl,
}

/// URL-specific errors
///
/// All of these mean "not a crawl target": extraction drops the link silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("Unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Health operations
pub type Result<T> = std::result::Result<T, SiteHealthError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, SiteCrawler};
pub use state::{CrawlPhase, LinkResult, LinkType, Severity};
pub use crate::url::{classify_link, normalize_url};
