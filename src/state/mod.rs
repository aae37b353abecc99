//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Tracks which round a crawl is in (idle, crawling, done)

mod crawl_state;

pub use crawl_state::CrawlState;
