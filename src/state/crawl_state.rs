//! Crawl state definitions
//!
//! A crawl moves from `Idle` through one `Crawling` state per round and ends in
//! `Done`.

use std::fmt;

/// Represents the current state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// No crawl has started yet
    Idle,

    /// Fetching and indexing the frontier of the given round (1-based)
    Crawling { round: u32 },

    /// Every round has run or the frontier is empty
    Done,
}

impl CrawlState {
    /// Returns true if no further rounds will run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the current round, if crawling
    pub fn round(&self) -> Option<u32> {
        match self {
            Self::Crawling { round } => Some(*round),
            _ => None,
        }
    }

    /// Checks whether moving to `next` is allowed
    ///
    /// Valid transitions:
    /// - `Idle` → `Crawling { round: 1 }` or `Done`
    /// - `Crawling { round: n }` → `Crawling { round: n + 1 }` or `Done`
    pub fn can_transition_to(&self, next: &CrawlState) -> bool {
        match (self, next) {
            (Self::Idle, Self::Crawling { round }) => *round == 1,
            (Self::Idle, Self::Done) => true,
            (Self::Crawling { round: current }, Self::Crawling { round }) => *round == current + 1,
            (Self::Crawling { .. }, Self::Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Crawling { round } => write!(f, "crawling (round {})", round),
            Self::Done => write!(f, "done"),
        }
    }
}
