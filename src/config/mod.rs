//! Configuration module for Site-Health
//!
//! This module handles loading, parsing, validating, and merging TOML
//! configuration files with command-line overrides.
//!
//! # Example
//!
//! ```no_run
//! use site_health::config::{load_config, CrawlOverrides};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-health.toml"))
//!     .and_then(|c| c.merge(CrawlOverrides { max_depth: Some(3), ..Default::default() }))
//!     .unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlOverrides, CrawlerConfig, OutputConfig, UserAgentConfig, VitalsConfig,
};

// Re-export parser functions
pub use parser::load_config;
