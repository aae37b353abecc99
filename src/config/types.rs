use crate::query::{PageRankNormalization, SearchOptions, Signal};
use crate::rank::RankParams;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure for Sumi-Index
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub rank: RankConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of breadth-first rounds to crawl from the seeds
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of fetches in flight within a round
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Time allowed for a single fetch (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// URLs to start crawling from
    #[serde(default)]
    pub seeds: Vec<String>,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL)
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Index storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Rank computation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,

    #[serde(default = "default_base")]
    pub base: f64,

    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_damping() -> f64 {
    RankParams::default().damping
}

fn default_base() -> f64 {
    RankParams::default().base
}

fn default_iterations() -> u32 {
    RankParams::default().iterations
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            base: default_base(),
            iterations: default_iterations(),
        }
    }
}

impl RankConfig {
    pub fn params(&self) -> RankParams {
        RankParams {
            damping: self.damping,
            base: self.base,
            iterations: self.iterations,
        }
    }
}

/// Query scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results per query
    #[serde(rename = "result-limit", default = "default_result_limit")]
    pub result_limit: usize,

    /// How stored rank scores are rescaled
    #[serde(rename = "pagerank-normalization", default)]
    pub pagerank_normalization: PageRankNormalization,

    /// Signals to combine and their weights
    #[serde(default = "default_weights", deserialize_with = "deserialize_weights")]
    pub weights: BTreeMap<Signal, f64>,
}

fn default_result_limit() -> usize {
    SearchOptions::default().limit
}

fn default_weights() -> BTreeMap<Signal, f64> {
    SearchOptions::default_weights().into_iter().collect()
}

/// Reads `signal-name = weight` pairs, rejecting unknown signal names
fn deserialize_weights<'de, D>(deserializer: D) -> Result<BTreeMap<Signal, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, weight)| {
            name.parse::<Signal>()
                .map(|signal| (signal, weight))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            pagerank_normalization: PageRankNormalization::default(),
            weights: default_weights(),
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            weights: self.weights.iter().map(|(&s, &w)| (s, w)).collect(),
            limit: self.result_limit,
            pagerank_normalization: self.pagerank_normalization,
        }
    }
}
