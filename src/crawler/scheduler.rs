//! Crawl state and frontier management
//!
//! This module handles:
//! - The FIFO frontier of (URL, depth) pairs
//! - The visited set, with check-and-set insertion
//! - First-discovered depth bookkeeping
//! - Draining the frontier one breadth-first layer at a time
//! - Accumulating results and the pages-crawled counter

use crate::state::LinkResult;
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

/// One breadth-first layer drained from the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Depth shared by every URL in the layer
    pub depth: u32,

    /// URLs marked visited by this drain, in frontier order
    pub urls: Vec<Url>,
}

/// Mutable state of one crawl
///
/// Shared between layer tasks behind a mutex; every method is a short
/// critical section with no I/O.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Pending (URL, depth) pairs, non-decreasing in depth
    frontier: VecDeque<(Url, u32)>,

    /// URLs claimed by a layer; only ever grows
    visited: HashSet<Url>,

    /// Depth at which each URL was first enqueued; never overwritten
    depth_map: HashMap<Url, u32>,

    /// Same-origin pages fetched successfully (HTML or not)
    pages_crawled: usize,

    /// Append-only result collection
    results: Vec<LinkResult>,
}

impl CrawlState {
    /// Creates the state with `start` seeded at depth 0
    pub fn new(start: Url) -> Self {
        let mut state = Self::default();
        state.enqueue(start, 0);
        state
    }

    /// Adds a URL to the frontier
    ///
    /// Returns false (and does nothing) if the URL has already been visited.
    /// A URL may sit in the frontier more than once; the drain keeps the
    /// first copy only.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if self.visited.contains(&url) {
            return false;
        }

        self.depth_map.entry(url.clone()).or_insert(depth);
        self.frontier.push_back((url, depth));
        true
    }

    /// Drains the next non-empty layer from the frontier
    ///
    /// Takes every consecutive entry that shares the head entry's depth,
    /// marking each unvisited one as visited. A layer whose entries were all
    /// visited already is skipped. Returns `None` once the frontier is empty.
    pub fn next_layer(&mut self) -> Option<Layer> {
        loop {
            let &(_, depth) = self.frontier.front()?;
            let mut urls = Vec::new();

            while let Some((_, d)) = self.frontier.front() {
                if *d != depth {
                    break;
                }
                let Some((url, _)) = self.frontier.pop_front() else {
                    break;
                };
                if self.visited.insert(url.clone()) {
                    self.depth_map.entry(url.clone()).or_insert(depth);
                    urls.push(url);
                }
            }

            if !urls.is_empty() {
                return Some(Layer { depth, urls });
            }
        }
    }

    /// Appends results produced by one task
    pub fn record_results(&mut self, results: impl IntoIterator<Item = LinkResult>) {
        self.results.extend(results);
    }

    /// Appends a single result
    pub fn record_result(&mut self, result: LinkResult) {
        self.results.push(result);
    }

    pub fn increment_pages(&mut self) {
        self.pages_crawled += 1;
    }

    pub fn pages_crawled(&self) -> usize {
        self.pages_crawled
    }

    pub fn visited(&self) -> &HashSet<Url> {
        &self.visited
    }

    pub fn depth_of(&self, url: &Url) -> Option<u32> {
        self.depth_map.get(url).copied()
    }

    pub fn depth_map(&self) -> &HashMap<Url, u32> {
        &self.depth_map
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Moves the accumulated results out, leaving the collection empty
    pub fn take_results(&mut self) -> Vec<LinkResult> {
        std::mem::take(&mut self.results)
    }
}
