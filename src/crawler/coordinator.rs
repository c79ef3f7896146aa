//! Crawler coordinator - breadth-first crawl orchestration
//!
//! This module contains the crawl loop that coordinates all aspects of one
//! crawl, including:
//! - Seeding the frontier and draining it layer by layer
//! - Fanning out page fetches and link checks inside a layer
//! - Waiting for the whole layer before starting the next one
//! - Consulting the permission oracle before enqueueing pages
//! - Cancellation and the crawl phase lifecycle

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::checker::LinkChecker;
use crate::crawler::fetcher::{build_http_client, FetchResult, PageFetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::sampling::select_sample;
use crate::crawler::scheduler::CrawlState;
use crate::robots::{robots_oracle, PermissionOracle};
use crate::state::{CrawlPhase, LinkResult, LinkType, ProbeOutcome};
use crate::url::{classify_link, extract_origin, is_same_origin, parse_absolute};
use crate::{SiteHealthError, UrlError};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use url::Url;

/// Fully resolved settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Seed URL (absolute, HTTP or HTTPS)
    pub start_url: String,

    /// Deepest layer whose pages are fetched; the seed is depth 0
    pub max_depth: u32,

    /// Upper bound on simultaneously in-flight HTTP requests
    pub max_concurrent: usize,

    /// Per-request timeout
    pub timeout: Duration,

    /// Whether robots.txt is consulted before enqueueing pages
    pub respect_robots: bool,

    /// User-Agent header value
    pub user_agent: String,
}

impl CrawlOptions {
    /// Options for `start_url` with every other field at its default
    pub fn new(start_url: impl Into<String>) -> Self {
        let crawler = CrawlerConfig::default();
        Self {
            start_url: start_url.into(),
            max_depth: crawler.max_depth,
            max_concurrent: crawler.max_concurrent as usize,
            timeout: Duration::from_secs_f64(crawler.timeout_secs),
            respect_robots: crawler.respect_robots,
            user_agent: UserAgentConfig::default().header_value(),
        }
    }
}

/// Cancels a running crawl from another task
///
/// The crawler stops before the next layer and returns the results gathered
/// so far.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a layer task needs, shared by reference count
struct LayerContext {
    checker: LinkChecker,
    fetcher: PageFetcher,
    state: Arc<Mutex<CrawlState>>,
    origin: String,
    max_depth: u32,
    timeout: Duration,
    permissions: Option<Arc<dyn PermissionOracle>>,
}

/// Breadth-first site crawler with integrated link checking
///
/// One instance runs exactly one crawl. The post-crawl accessors expose the
/// visited set and depth bookkeeping to downstream analyzers.
///
/// # Example
///
/// ```no_run
/// use site_health::{CrawlOptions, SiteCrawler};
///
/// # async fn run() -> site_health::Result<()> {
/// let mut crawler = SiteCrawler::new(CrawlOptions::new("https://example.com"))?;
/// let results = crawler.crawl().await?;
/// println!("{} pages, {} links", crawler.pages_crawled(), results.len());
/// # Ok(())
/// # }
/// ```
pub struct SiteCrawler {
    options: CrawlOptions,
    start_url: Url,
    origin: String,
    client: reqwest::Client,
    limiter: Arc<Semaphore>,
    state: Arc<Mutex<CrawlState>>,
    phase: CrawlPhase,
    permissions: Option<Arc<dyn PermissionOracle>>,
    cancel: CancelHandle,
}

impl SiteCrawler {
    /// Creates a crawler for `options.start_url`
    ///
    /// # Returns
    ///
    /// * `Ok(SiteCrawler)` - Ready to crawl
    /// * `Err(SiteHealthError)` - Invalid start URL or HTTP client failure
    pub fn new(options: CrawlOptions) -> Result<Self, SiteHealthError> {
        let start_url = parse_absolute(&options.start_url)?;
        let origin = extract_origin(&start_url).ok_or(UrlError::MissingHost)?;
        let client = build_http_client(&options.user_agent, options.timeout)?;
        let limiter = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
        let state = Arc::new(Mutex::new(CrawlState::new(start_url.clone())));

        Ok(Self {
            options,
            start_url,
            origin,
            client,
            limiter,
            state,
            phase: CrawlPhase::Idle,
            permissions: None,
            cancel: CancelHandle::default(),
        })
    }

    /// Replaces the robots.txt lookup with a custom permission oracle
    ///
    /// Only consulted when `respect_robots` is set.
    pub fn with_permission_oracle(mut self, oracle: Arc<dyn PermissionOracle>) -> Self {
        self.permissions = Some(oracle);
        self
    }

    /// Returns a handle that cancels this crawl
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs the crawl and returns every link result
    ///
    /// Per-link and per-page failures are recorded as `error` results. Only a
    /// failed layer task aborts the crawl, with
    /// [`SiteHealthError::SchedulerFatal`]; the phase is then `Failed`.
    pub async fn crawl(&mut self) -> Result<Vec<LinkResult>, SiteHealthError> {
        if !self.advance(CrawlPhase::Running) {
            return Err(SiteHealthError::AlreadyCrawled);
        }

        info!(
            "Starting crawl of {} (max depth {}, max concurrent {})",
            self.start_url, self.options.max_depth, self.options.max_concurrent
        );
        let started = Instant::now();

        match self.run_layers().await {
            Ok(results) => {
                self.advance(CrawlPhase::Completed);
                info!(
                    "Crawl complete: {} pages, {} links checked in {:.2}s",
                    self.pages_crawled(),
                    results.len(),
                    started.elapsed().as_secs_f64()
                );
                Ok(results)
            }
            Err(e) => {
                self.advance(CrawlPhase::Failed);
                error!("Crawl of {} failed: {}", self.start_url, e);
                Err(e)
            }
        }
    }

    /// Moves to `to` if the lifecycle allows it
    fn advance(&mut self, to: CrawlPhase) -> bool {
        if !self.phase.can_transition_to(to) {
            return false;
        }
        debug!("Crawler phase {} -> {}", self.phase, to);
        self.phase = to;
        true
    }

    async fn run_layers(&mut self) -> Result<Vec<LinkResult>, SiteHealthError> {
        let permissions = if self.options.respect_robots {
            Some(match &self.permissions {
                Some(oracle) => Arc::clone(oracle),
                None => {
                    robots_oracle(
                        &self.client,
                        &self.limiter,
                        &self.start_url,
                        &self.options.user_agent,
                    )
                    .await
                }
            })
        } else {
            None
        };

        let ctx = Arc::new(LayerContext {
            checker: LinkChecker::new(
                self.client.clone(),
                Arc::clone(&self.limiter),
                self.origin.clone(),
                self.options.timeout,
            ),
            fetcher: PageFetcher::new(self.client.clone(), Arc::clone(&self.limiter)),
            state: Arc::clone(&self.state),
            origin: self.origin.clone(),
            max_depth: self.options.max_depth,
            timeout: self.options.timeout,
            permissions,
        });

        loop {
            if self.cancel.is_cancelled() {
                info!("Crawl cancelled, returning partial results");
                break;
            }

            let Some(layer) = lock_state(&self.state).next_layer() else {
                break;
            };
            info!("Processing depth {} ({} URLs)", layer.depth, layer.urls.len());

            let mut tasks = JoinSet::new();
            for url in layer.urls {
                tasks.spawn(crawl_page(Arc::clone(&ctx), url, layer.depth));
            }

            // Layer barrier
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => return Err(e),
                    Err(e) => {
                        return Err(SiteHealthError::SchedulerFatal(format!(
                            "page task failed: {}",
                            e
                        )))
                    }
                }
            }
        }

        Ok(lock_state(&self.state).take_results())
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Origin key (host and explicit port) of the start URL
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of same-origin pages fetched successfully
    pub fn pages_crawled(&self) -> usize {
        lock_state(&self.state).pages_crawled()
    }

    pub fn visited_pages(&self) -> HashSet<Url> {
        lock_state(&self.state).visited().clone()
    }

    /// Depth at which `url` was first discovered, if it ever was
    pub fn depth_of(&self, url: &Url) -> Option<u32> {
        lock_state(&self.state).depth_of(url)
    }

    pub fn depth_map(&self) -> HashMap<Url, u32> {
        lock_state(&self.state).depth_map().clone()
    }

    /// Entries still waiting in the frontier (zero after a full crawl)
    pub fn frontier_len(&self) -> usize {
        lock_state(&self.state).frontier_len()
    }

    /// Visited same-origin pages accepted by `filter`, sorted
    ///
    /// Assets (images, stylesheets, scripts) are never returned.
    pub fn pages_for_analysis<F>(&self, filter: F) -> Vec<Url>
    where
        F: Fn(&Url) -> bool,
    {
        let state = lock_state(&self.state);
        let mut pages: Vec<Url> = state
            .visited()
            .iter()
            .filter(|url| is_same_origin(url, &self.origin))
            .filter(|url| classify_link(url, &self.origin) == LinkType::Page)
            .filter(|url| filter(url))
            .cloned()
            .collect();
        pages.sort();
        pages
    }

    /// Stratified sample of crawled pages for vitals measurement
    pub fn vitals_sample(&self, rate: f64) -> HashSet<Url> {
        let pages = self.pages_for_analysis(|_| true);
        let depth_map = self.depth_map();
        select_sample(&pages, &self.start_url, &depth_map, rate)
    }
}

/// Locks the crawl state; a panicked holder cannot leave it half-updated
fn lock_state(state: &Mutex<CrawlState>) -> MutexGuard<'_, CrawlState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Processes one frontier entry
async fn crawl_page(ctx: Arc<LayerContext>, url: Url, depth: u32) -> Result<(), SiteHealthError> {
    if !is_same_origin(&url, &ctx.origin) {
        let result = ctx.checker.check(&url, &url).await;
        lock_state(&ctx.state).record_result(result);
        return Ok(());
    }

    match ctx.fetcher.fetch(&url).await {
        FetchResult::Success { body, .. } => {
            lock_state(&ctx.state).increment_pages();

            let links = extract_links(&body, &url);
            debug!("Found {} links on {} (depth {})", links.len(), url, depth);

            let checked = check_links(&ctx, &url, links).await?;
            let next: Vec<Url> = checked
                .iter()
                .filter(|(target, result)| should_follow(&ctx, depth, target, result))
                .map(|(target, _)| target.clone())
                .collect();

            let mut state = lock_state(&ctx.state);
            for target in next {
                if state.enqueue(target.clone(), depth + 1) {
                    debug!("Queued {} at depth {}", target, depth + 1);
                }
            }
            state.record_results(checked.into_iter().map(|(_, result)| result));
        }
        FetchResult::ContentMismatch { content_type } => {
            debug!("Not parsing {} ({})", url, content_type);
            lock_state(&ctx.state).increment_pages();
        }
        FetchResult::HttpError {
            status_code,
            elapsed,
        } => {
            warn!("Page {} returned HTTP {}", url, status_code);
            let result = LinkResult::page_http_error(url.as_str(), status_code, elapsed);
            lock_state(&ctx.state).record_result(result);
        }
        FetchResult::Timeout => {
            warn!("Page {} timed out", url);
            let result = page_failure(&ctx, &url, ProbeOutcome::Timeout);
            lock_state(&ctx.state).record_result(result);
        }
        FetchResult::NetworkError { error } => {
            warn!("Page {} failed: {}", url, error);
            let result = page_failure(&ctx, &url, ProbeOutcome::Transport(error));
            lock_state(&ctx.state).record_result(result);
        }
    }

    Ok(())
}

/// Checks every link of one page concurrently
async fn check_links(
    ctx: &Arc<LayerContext>,
    page: &Url,
    links: BTreeSet<Url>,
) -> Result<Vec<(Url, LinkResult)>, SiteHealthError> {
    let mut checks = JoinSet::new();
    for target in links {
        let ctx = Arc::clone(ctx);
        let source = page.clone();
        checks.spawn(async move {
            let result = ctx.checker.check(&source, &target).await;
            (target, result)
        });
    }

    let mut checked = Vec::with_capacity(checks.len());
    while let Some(joined) = checks.join_next().await {
        let pair = joined.map_err(|e| {
            SiteHealthError::SchedulerFatal(format!("link check task failed: {}", e))
        })?;
        checked.push(pair);
    }

    Ok(checked)
}

/// Whether a checked link becomes a page of the next layer
fn should_follow(ctx: &LayerContext, depth: u32, target: &Url, result: &LinkResult) -> bool {
    if depth >= ctx.max_depth || result.link_type != LinkType::Page || result.is_error() {
        return false;
    }

    match &ctx.permissions {
        Some(oracle) if !oracle.is_allowed(target) => {
            debug!("Robots disallow {}", target);
            false
        }
        _ => true,
    }
}

fn page_failure(ctx: &LayerContext, url: &Url, outcome: ProbeOutcome) -> LinkResult {
    LinkResult::from_outcome(url.as_str(), url.as_str(), LinkType::Page, outcome, ctx.timeout)
}
