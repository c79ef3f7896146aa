//! Performance vitals contract
//!
//! Vitals (LCP, CLS, INP) are measured by an external browser-driven service.
//! This module defines what that service returns and how a finished crawl
//! hands it a stratified sample of pages.

use crate::crawler::SiteCrawler;
use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use tracing::info;
use url::Url;

/// Outcome of measuring one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalsStatus {
    Success,
    Failed,
}

impl VitalsStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for VitalsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Core web vitals for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageVitals {
    pub url: String,

    /// Largest contentful paint, seconds
    pub lcp: Option<f64>,

    /// Cumulative layout shift, unitless
    pub cls: Option<f64>,

    /// Interaction to next paint, milliseconds
    pub inp: Option<f64>,

    pub measured_at: DateTime<Utc>,
    pub status: VitalsStatus,
    pub error_message: Option<String>,
}

impl PageVitals {
    /// A failed measurement with no metrics
    pub fn failed(url: &str, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            lcp: None,
            cls: None,
            inp: None,
            measured_at: Utc::now(),
            status: VitalsStatus::Failed,
            error_message: Some(message.into()),
        }
    }
}

/// External vitals measurement service
pub trait VitalsMeasurer {
    /// Measures every URL, returning one entry per URL in the same order
    fn measure_pages(&self, urls: &[Url]) -> impl Future<Output = Vec<PageVitals>> + Send;
}

/// Measures a stratified sample of a finished crawl's pages
///
/// URLs are handed to the measurer sorted, so repeated runs over the same
/// sample measure in the same order.
pub async fn measure_sample<M: VitalsMeasurer>(
    crawler: &SiteCrawler,
    measurer: &M,
    rate: f64,
) -> Vec<PageVitals> {
    let mut sample: Vec<Url> = crawler.vitals_sample(rate).into_iter().collect();
    sample.sort();

    info!("Measuring vitals for {} sampled pages", sample.len());
    measurer.measure_pages(&sample).await
}
