use serde::Deserialize;

/// Main configuration structure for Site-Health
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL to crawl when none is given on the command line
    #[serde(rename = "start-url")]
    pub start_url: Option<String>,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub vitals: VitalsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the start URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of simultaneously in-flight HTTP requests
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: f64,

    /// Whether to consult robots.txt before following same-origin pages
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_concurrent: 10,
            timeout_secs: 10.0,
            respect_robots: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "site-health".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/site-health/site-health".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown report, if one should be written
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "site_health.db".to_string(),
            summary_path: None,
        }
    }
}

/// Vitals sampling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    /// Fraction of crawled pages (0.0 to 1.0) selected for vitals measurement
    #[serde(rename = "sample-rate")]
    pub sample_rate: f64,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self { sample_rate: 0.1 }
    }
}

/// Command-line values that take precedence over the config file
///
/// `None` keeps whatever the file (or the defaults) said.
#[derive(Debug, Clone, Default)]
pub struct CrawlOverrides {
    pub start_url: Option<String>,
    pub max_depth: Option<u32>,
    pub max_concurrent: Option<u32>,
    pub timeout_secs: Option<f64>,
    pub respect_robots: Option<bool>,
    pub database_path: Option<String>,
    pub summary_path: Option<String>,
    pub sample_rate: Option<f64>,
}
