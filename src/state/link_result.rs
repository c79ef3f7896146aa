/// Link result definitions for recording the outcome of each checked edge
///
/// This module defines the link categories, the severity scale, and the
/// immutable [`LinkResult`] record produced once per checked link.
use std::fmt;
use std::time::Duration;

/// Responses slower than this are downgraded to a warning
pub const SLOW_RESPONSE_SECS: f64 = 5.0;

/// Category of a link target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkType {
    /// Same-origin document that may be crawled further
    Page,
    /// Image asset (png, jpg, jpeg, gif, svg, webp, ico)
    Image,
    /// Stylesheet
    Css,
    /// Script
    Js,
    /// Anything on a different origin
    External,
}

impl LinkType {
    /// Converts the link type to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Image => "image",
            Self::Css => "css",
            Self::Js => "js",
            Self::External => "external",
        }
    }

    /// Parses a link type from a database string representation
    ///
    /// Returns None if the string doesn't match any known type.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "page" => Some(Self::Page),
            "image" => Some(Self::Image),
            "css" => Some(Self::Css),
            "js" => Some(Self::Js),
            "external" => Some(Self::External),
            _ => None,
        }
    }

    /// Returns all link types
    pub fn all_types() -> Vec<Self> {
        vec![Self::Page, Self::Image, Self::Css, Self::Js, Self::External]
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Coarse outcome of a single link check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Maps an HTTP response to a severity
    ///
    /// Rules are evaluated in order:
    /// 1. status >= 400 → Error
    /// 2. status 300..=399, or a response slower than 5 seconds → Warning
    /// 3. anything else → Success
    pub fn from_response(status_code: u16, response_time: f64) -> Self {
        if status_code >= 400 {
            Self::Error
        } else if (300..400).contains(&status_code) || response_time > SLOW_RESPONSE_SECS {
            Self::Warning
        } else {
            Self::Success
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// What happened on the wire for one request
///
/// Produced by the HTTP call wrappers and consumed exactly once, by
/// [`LinkResult::from_outcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The server answered (after following redirects)
    Response { status_code: u16, elapsed: Duration },
    /// The request exceeded its deadline
    Timeout,
    /// Connection refused, DNS failure, TLS failure, ...
    Transport(String),
}

impl ProbeOutcome {
    /// Classifies a reqwest error into a timeout or a transport failure
    pub fn from_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Outcome of checking one edge (source page → target resource)
#[derive(Debug, Clone, PartialEq)]
pub struct LinkResult {
    /// Page the link was found on
    pub source_url: String,

    /// Resource the link points at
    pub target_url: String,

    /// Category of the target
    pub link_type: LinkType,

    /// Final HTTP status code, if the server answered
    pub status_code: Option<u16>,

    /// Response time in seconds
    pub response_time: f64,

    /// Severity derived from status code, response time and transport outcome
    pub severity: Severity,

    /// Human-readable failure description
    pub error_message: Option<String>,
}

impl LinkResult {
    /// Builds the result for a probe outcome
    ///
    /// `timeout` is reported as the response time of a timed-out request.
    pub fn from_outcome(
        source_url: &str,
        target_url: &str,
        link_type: LinkType,
        outcome: ProbeOutcome,
        timeout: Duration,
    ) -> Self {
        let (status_code, response_time, severity, error_message) = match outcome {
            ProbeOutcome::Response {
                status_code,
                elapsed,
            } => {
                let secs = elapsed.as_secs_f64();
                (
                    Some(status_code),
                    secs,
                    Severity::from_response(status_code, secs),
                    None,
                )
            }
            ProbeOutcome::Timeout => (
                None,
                timeout.as_secs_f64(),
                Severity::Error,
                Some("Request timeout".to_string()),
            ),
            ProbeOutcome::Transport(message) => (None, 0.0, Severity::Error, Some(message)),
        };

        Self {
            source_url: source_url.to_string(),
            target_url: target_url.to_string(),
            link_type,
            status_code,
            response_time,
            severity,
            error_message,
        }
    }

    /// Builds the terminal result for a same-origin page that answered >= 400
    pub fn page_http_error(page_url: &str, status_code: u16, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        Self {
            source_url: page_url.to_string(),
            target_url: page_url.to_string(),
            link_type: LinkType::Page,
            status_code: Some(status_code),
            response_time: secs,
            severity: Severity::from_response(status_code, secs),
            error_message: Some(format!("HTTP {}", status_code)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}
