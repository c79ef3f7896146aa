use crate::config::types::{Config, CrawlOverrides};
use crate::config::validation::validate;
use crate::crawler::CrawlOptions;
use crate::ConfigError;
use std::path::Path;
use std::time::Duration;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_health::config::load_config;
///
/// let config = load_config(Path::new("site-health.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

impl Config {
    /// Merges command-line overrides into this configuration
    ///
    /// Every `Some` in `overrides` replaces the file value; the merged result is
    /// validated again.
    pub fn merge(mut self, overrides: CrawlOverrides) -> Result<Self, ConfigError> {
        if let Some(url) = overrides.start_url {
            self.start_url = Some(url);
        }
        if let Some(depth) = overrides.max_depth {
            self.crawler.max_depth = depth;
        }
        if let Some(max_concurrent) = overrides.max_concurrent {
            self.crawler.max_concurrent = max_concurrent;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.crawler.timeout_secs = timeout;
        }
        if let Some(respect) = overrides.respect_robots {
            self.crawler.respect_robots = respect;
        }
        if let Some(path) = overrides.database_path {
            self.output.database_path = path;
        }
        if let Some(path) = overrides.summary_path {
            self.output.summary_path = Some(path);
        }
        if let Some(rate) = overrides.sample_rate {
            self.vitals.sample_rate = rate;
        }

        validate(&self)?;
        Ok(self)
    }

    /// Resolves the configuration into the options the crawler accepts
    pub fn crawl_options(&self) -> Result<CrawlOptions, ConfigError> {
        let start_url = self
            .start_url
            .clone()
            .ok_or(ConfigError::MissingStartUrl)?;

        let timeout = Duration::try_from_secs_f64(self.crawler.timeout_secs).map_err(|e| {
            ConfigError::Validation(format!(
                "timeout_secs {} is not a valid duration: {}",
                self.crawler.timeout_secs, e
            ))
        })?;

        Ok(CrawlOptions {
            start_url,
            max_depth: self.crawler.max_depth,
            max_concurrent: self.crawler.max_concurrent as usize,
            timeout,
            respect_robots: self.crawler.respect_robots,
            user_agent: self.user_agent.header_value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
start-url = "https://example.com"

[crawler]
max-depth = 3
max-concurrent = 5
timeout-secs = 15.0
respect-robots = false

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
database-path = "./test.db"
summary-path = "./report.md"

[vitals]
sample-rate = 0.25
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.start_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_concurrent, 5);
        assert_eq!(config.crawler.timeout_secs, 15.0);
        assert!(!config.crawler.respect_robots);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.summary_path.as_deref(), Some("./report.md"));
        assert_eq!(config.vitals.sample_rate, 0.25);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.start_url, None);
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.max_concurrent, 10);
        assert_eq!(config.crawler.timeout_secs, 10.0);
        assert!(config.crawler.respect_robots);
        assert_eq!(config.output.database_path, "site_health.db");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let file = create_temp_config("[crawler]\nmax-depth = 5\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 5);
        assert_eq!(config.crawler.max_concurrent, 10);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-concurrent = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_merge_overrides_take_precedence() {
        let file = create_temp_config(
            "start-url = \"https://example.com\"\n[crawler]\nmax-depth = 2\n",
        );
        let config = load_config(file.path()).unwrap();

        let merged = config
            .merge(CrawlOverrides {
                max_depth: Some(5),
                respect_robots: Some(false),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(merged.start_url.as_deref(), Some("https://example.com"));
        assert_eq!(merged.crawler.max_depth, 5);
        assert!(!merged.crawler.respect_robots);
        assert_eq!(merged.crawler.max_concurrent, 10);
    }

    #[test]
    fn test_merge_revalidates() {
        let result = Config::default().merge(CrawlOverrides {
            sample_rate: Some(2.0),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_crawl_options() {
        let config = Config::default()
            .merge(CrawlOverrides {
                start_url: Some("https://example.com".to_string()),
                timeout_secs: Some(2.5),
                ..Default::default()
            })
            .unwrap();

        let options = config.crawl_options().unwrap();
        assert_eq!(options.start_url, "https://example.com");
        assert_eq!(options.max_depth, 2);
        assert_eq!(options.max_concurrent, 10);
        assert_eq!(options.timeout, Duration::from_millis(2500));
        assert!(options.user_agent.starts_with("site-health/"));
    }

    #[test]
    fn test_huge_timeout_is_rejected() {
        let result = Config::default().merge(CrawlOverrides {
            start_url: Some("https://example.com".to_string()),
            timeout_secs: Some(1e20),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        // Fields set directly skip validation but still cannot overflow
        let mut config = Config::default();
        config.start_url = Some("https://example.com".to_string());
        config.crawler.timeout_secs = 1e20;
        assert!(matches!(
            config.crawl_options(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_crawl_options_without_start_url() {
        let result = Config::default().crawl_options();
        assert!(matches!(result, Err(ConfigError::MissingStartUrl)));
    }
}
