/// Lifecycle of a single crawler instance
use std::fmt;

/// Phase of a [`SiteCrawler`](crate::crawler::SiteCrawler)
///
/// A crawler runs exactly once: `Idle → Running → {Completed, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Created, `crawl()` not called yet
    Idle,
    /// `crawl()` in progress
    Running,
    /// `crawl()` returned results (possibly partial after cancellation)
    Completed,
    /// `crawl()` returned a fatal error
    Failed,
}

impl CrawlPhase {
    /// Returns true if `from → to` is a legal transition
    pub fn can_transition_to(&self, to: CrawlPhase) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
        )
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
