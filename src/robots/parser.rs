//! Robots.txt parser implementation
//!
//! This module checks URLs against robots.txt content using the robotstxt crate.

use crate::robots::PermissionOracle;
use robotstxt::DefaultMatcher;
use url::Url;

/// Parsed robots.txt data for one origin and one crawler
///
/// This is a wrapper around the robotstxt crate's matcher, providing a
/// simplified interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Product token matched against `User-agent` lines
    user_agent: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    ///
    /// `user_agent` may be a full header value such as
    /// `site-health/0.1.0 (+https://...)`; only the product token before the
    /// first `/` is matched against the file.
    pub fn from_content(content: &str, user_agent: &str) -> Self {
        Self {
            content: content.to_string(),
            user_agent: product_token(user_agent),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used as the default when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            user_agent: String::new(),
            allow_all: true,
        }
    }

    /// Checks if a URL is allowed for this crawler
    pub fn allows(&self, url: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        // Parse and check on-demand
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &self.user_agent, url)
    }
}

impl PermissionOracle for ParsedRobots {
    fn is_allowed(&self, url: &Url) -> bool {
        self.allows(url.as_str())
    }
}

fn product_token(user_agent: &str) -> String {
    user_agent
        .split(['/', ' '])
        .next()
        .unwrap_or_default()
        .to_string()
}
