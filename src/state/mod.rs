//! State module for crawl outcomes
//!
//! # Components
//!
//! - `LinkResult`: Immutable record of one checked edge (source → target)
//! - `LinkType` / `Severity`: Classification of a link and of its check outcome
//! - `ProbeOutcome`: Closed result of one HTTP call (response, timeout, transport failure)
//! - `CrawlPhase`: Lifecycle of a crawler instance

mod crawl_phase;
mod link_result;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use link_result::{LinkResult, LinkType, ProbeOutcome, Severity, SLOW_RESPONSE_SECS};
