//! Crawler module for fetching and indexing linked pages
//!
//! This module contains the crawl loop and its collaborators:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML text and link extraction behind the `PageParser` trait
//! - The breadth-first frontier
//! - Round-by-round crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlReport, CrawlSettings, Crawler, MAX_CONCURRENT_FETCHES};
pub use fetcher::{build_http_client, HttpFetcher};
pub use frontier::Frontier;
pub use parser::HtmlParser;

use std::future::Future;
use thiserror::Error;

/// Errors raised while retrieving a single page
///
/// The crawler recovers from all of these by dropping the URL from its round.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("{url} is not HTML (Content-Type: {content_type})")]
    ContentMismatch { url: String, content_type: String },
}

impl FetchError {
    /// URL of the page that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. }
            | Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::ContentMismatch { url, .. } => url,
        }
    }
}

/// Retrieves the raw bytes of a page
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// A link found on a page, before resolution against the page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub href: String,
    pub anchor_text: String,
}

/// Visible text and outgoing links extracted from a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub text: String,
    pub links: Vec<ParsedLink>,
}

/// Turns raw page bytes into text and links
pub trait PageParser {
    fn parse(&self, raw: &[u8]) -> ParsedPage;
}
