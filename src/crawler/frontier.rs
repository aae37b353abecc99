//! Breadth-first crawl frontier
//!
//! The frontier hands out one round of URLs at a time. Links discovered while a
//! round is processed are queued for the next round, and a URL is never handed
//! out twice.

use std::collections::HashSet;
use url::Url;

/// URLs waiting to be crawled, plus everything already handed out
#[derive(Debug, Clone)]
pub struct Frontier {
    /// URLs for the next round, in discovery order
    pending: Vec<Url>,

    /// Same URLs as `pending`, for constant-time duplicate checks
    queued: HashSet<String>,

    /// Every URL handed out by a previous round
    visited: HashSet<String>,

    /// Rounds left before the depth bound is reached
    depth_remaining: u32,
}

impl Frontier {
    /// Creates a frontier seeded with `seeds` that will run at most `max_depth` rounds
    pub fn new(seeds: impl IntoIterator<Item = Url>, max_depth: u32) -> Self {
        let mut frontier = Self {
            pending: Vec::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            depth_remaining: max_depth,
        };
        for seed in seeds {
            frontier.enqueue(seed);
        }
        frontier
    }

    /// Takes every pending URL for the next round
    ///
    /// Returns None once the depth bound is reached or nothing is pending.
    pub fn next_round(&mut self) -> Option<Vec<Url>> {
        if self.depth_remaining == 0 || self.pending.is_empty() {
            return None;
        }

        self.depth_remaining -= 1;
        self.queued.clear();
        let round = std::mem::take(&mut self.pending);
        self.visited
            .extend(round.iter().map(|url| url.as_str().to_string()));
        Some(round)
    }

    /// Queues a URL for the next round
    ///
    /// Returns false if the URL was already visited or is already queued.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(url.as_str()) || self.queued.contains(url.as_str()) {
            return false;
        }

        self.queued.insert(url.as_str().to_string());
        self.pending.push(url);
        true
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn depth_remaining(&self) -> u32 {
        self.depth_remaining
    }
}
