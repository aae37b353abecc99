//! Sumi-Index: a small web indexing and ranking engine
//!
//! This crate crawls linked pages, builds an inverted index of terms to document
//! positions and a directed link graph, computes a PageRank-style importance score
//! over that graph, and answers multi-term queries by combining several relevance
//! signals into one ranked list.

pub mod config;
pub mod crawler;
pub mod indexer;
pub mod output;
pub mod query;
pub mod rank;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Index operations
#[derive(Debug, Error)]
pub enum SumiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Unsupported character in URL: {0}")]
    UnsupportedCharacter(String),
}

/// Result type alias for Sumi-Index operations
pub type Result<T> = std::result::Result<T, SumiError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use indexer::{index_document, IndexOutcome};
pub use query::{search, SearchHit, SearchOptions, Signal};
pub use rank::{compute_ranks, RankParams};
pub use state::CrawlState;
pub use storage::{SqliteStorage, Storage};
