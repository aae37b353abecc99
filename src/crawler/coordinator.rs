//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the round-by-round crawl loop, which:
//! - Fetches every URL of a round concurrently, bounded by a semaphore
//! - Parses fetched pages and resolves their links
//! - Hands each page to the indexer under the storage lock
//! - Queues unindexed link targets for the next round

use crate::config::{Config, CrawlerConfig};
use crate::crawler::frontier::Frontier;
use crate::crawler::{FetchError, Fetcher, HtmlParser, HttpFetcher, PageParser};
use crate::indexer::{index_document, IndexOutcome, OutboundLink};
use crate::state::CrawlState;
use crate::storage::{SqliteStorage, Storage};
use crate::url::{normalize_url, resolve_link};
use crate::SumiError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Upper bound on fetches in flight, whatever the settings ask for
pub const MAX_CONCURRENT_FETCHES: usize = 100;

/// Limits applied to a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Number of breadth-first rounds
    pub max_depth: u32,

    /// Maximum number of fetches in flight
    pub max_concurrent_fetches: usize,

    /// Time allowed for a single fetch
    pub request_timeout: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_concurrent_fetches: 8,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CrawlSettings {
    /// Fetch permits per round, clamped to `1..=MAX_CONCURRENT_FETCHES`
    pub fn fetch_permits(&self) -> usize {
        self.max_concurrent_fetches.clamp(1, MAX_CONCURRENT_FETCHES)
    }
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_concurrent_fetches: config.max_concurrent_fetches as usize,
            request_timeout: config.request_timeout(),
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Rounds that were started
    pub rounds: u32,

    /// Pages fetched successfully
    pub fetched: usize,

    /// Pages newly indexed
    pub indexed: usize,

    /// URLs skipped because they were indexed already
    pub already_indexed: usize,

    /// URLs dropped because the fetch failed or timed out
    pub fetch_failures: usize,

    /// Fetched pages the indexer rejected
    pub index_failures: usize,
}

/// Main crawler structure
pub struct Crawler<F, P> {
    storage: Arc<Mutex<SqliteStorage>>,
    fetcher: Arc<F>,
    parser: P,
    settings: CrawlSettings,
    state: CrawlState,
}

impl Crawler<HttpFetcher, HtmlParser> {
    /// Creates a crawler that fetches over HTTP and parses HTML
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    /// * `storage` - Shared storage the crawl indexes into
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(SumiError)` - The HTTP client could not be built
    pub fn from_config(
        config: &Config,
        storage: Arc<Mutex<SqliteStorage>>,
    ) -> Result<Self, SumiError> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.crawler.request_timeout())?;
        Ok(Self::new(
            storage,
            fetcher,
            HtmlParser,
            CrawlSettings::from(&config.crawler),
        ))
    }
}

impl<F: Fetcher, P: PageParser> Crawler<F, P> {
    pub fn new(
        storage: Arc<Mutex<SqliteStorage>>,
        fetcher: F,
        parser: P,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            storage,
            fetcher: Arc::new(fetcher),
            parser,
            settings,
            state: CrawlState::Idle,
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn storage(&self) -> Arc<Mutex<SqliteStorage>> {
        Arc::clone(&self.storage)
    }

    /// Crawls breadth-first from `seeds`
    ///
    /// Each round fetches every pending URL, indexes what it gets back, and
    /// queues link targets that are neither indexed nor already visited. The
    /// crawl stops after `max_depth` rounds or when a round discovers nothing
    /// new. Fetch and indexing failures are logged and counted; only storage
    /// failures outside the indexer abort the crawl.
    ///
    /// # Arguments
    ///
    /// * `seeds` - Starting URLs; invalid ones are logged and skipped
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Counts of what happened
    /// * `Err(SumiError)` - Storage became unusable
    pub async fn crawl(&mut self, seeds: &[String]) -> Result<CrawlReport, SumiError> {
        if self.state.is_terminal() {
            self.state = CrawlState::Idle;
        }

        let start_time = Instant::now();
        let mut report = CrawlReport::default();
        let mut frontier = Frontier::new(valid_seeds(seeds), self.settings.max_depth);

        tracing::info!(
            "Starting crawl: {} seeds, max depth {}",
            frontier.pending_len(),
            self.settings.max_depth
        );

        while let Some(round_urls) = frontier.next_round() {
            let round = report.rounds + 1;
            self.transition(CrawlState::Crawling { round })?;
            report.rounds = round;

            let to_fetch = self.skip_indexed(round_urls, &mut report)?;
            tracing::info!("Round {}: fetching {} pages", round, to_fetch.len());

            let expected = to_fetch.len();
            let results = self.fetch_round(to_fetch).await;
            report.fetch_failures += expected - results.len();

            for (url, result) in results {
                let body = match result {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!("Dropping {}: {}", url, e);
                        report.fetch_failures += 1;
                        continue;
                    }
                };
                report.fetched += 1;

                let page = self.parser.parse(&body);
                let links: Vec<OutboundLink> = page
                    .links
                    .iter()
                    .filter_map(|link| {
                        resolve_link(&link.href, &url)
                            .map(|target| OutboundLink::new(target.as_str(), &link.anchor_text))
                    })
                    .collect();

                let outcome = {
                    let mut storage = self.lock_storage()?;
                    index_document(&mut *storage, url.as_str(), &page.text, &links)
                };

                match outcome {
                    Ok(IndexOutcome::Indexed {
                        document_id,
                        postings,
                        links: edges,
                    }) => {
                        tracing::debug!(
                            "Indexed {} as document {} ({} postings, {} links)",
                            url,
                            document_id,
                            postings,
                            edges
                        );
                        report.indexed += 1;
                    }
                    Ok(IndexOutcome::AlreadyIndexed { .. }) => {
                        report.already_indexed += 1;
                    }
                    Err(e) => {
                        tracing::error!("{}", e);
                        report.index_failures += 1;
                        continue;
                    }
                }

                self.enqueue_links(&mut frontier, &links)?;
            }
        }

        self.transition(CrawlState::Done)?;
        tracing::info!(
            "Crawl completed in {:?}: {} rounds, {} fetched, {} indexed, {} failed",
            start_time.elapsed(),
            report.rounds,
            report.fetched,
            report.indexed,
            report.fetch_failures + report.index_failures
        );

        Ok(report)
    }

    /// Fetches a round of URLs concurrently
    ///
    /// Results come back in the order the URLs were given. A fetch task that
    /// panics is logged and left out of the results.
    async fn fetch_round(&self, urls: Vec<Url>) -> Vec<(Url, Result<Vec<u8>, FetchError>)> {
        let semaphore = Arc::new(Semaphore::new(self.settings.fetch_permits()));
        let request_timeout = self.settings.request_timeout;
        let mut tasks = JoinSet::new();

        for (index, url) in urls.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                tracing::debug!("Fetching {}", url);

                let result =
                    match tokio::time::timeout(request_timeout, fetcher.fetch(url.as_str())).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout {
                            url: url.to_string(),
                        }),
                    };
                (index, url, result)
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(fetched) => results.push(fetched),
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
        }

        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, url, result)| (url, result))
            .collect()
    }

    /// Drops URLs that are already indexed from a round
    fn skip_indexed(
        &self,
        urls: Vec<Url>,
        report: &mut CrawlReport,
    ) -> Result<Vec<Url>, SumiError> {
        let storage = self.lock_storage()?;
        let mut to_fetch = Vec::with_capacity(urls.len());

        for url in urls {
            if storage.is_indexed(url.as_str())? {
                tracing::debug!("Skipping {}: already indexed", url);
                report.already_indexed += 1;
            } else {
                to_fetch.push(url);
            }
        }

        Ok(to_fetch)
    }

    /// Queues link targets that are not indexed yet
    fn enqueue_links(
        &self,
        frontier: &mut Frontier,
        links: &[OutboundLink],
    ) -> Result<(), SumiError> {
        let storage = self.lock_storage()?;

        for link in links {
            if frontier.is_visited(&link.target_url) || storage.is_indexed(&link.target_url)? {
                continue;
            }

            // Resolved links always parse
            if let Ok(url) = Url::parse(&link.target_url) {
                frontier.enqueue(url);
            }
        }

        Ok(())
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), SumiError> {
        if !self.state.can_transition_to(&next) {
            return Err(SumiError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Crawl state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn lock_storage(&self) -> Result<MutexGuard<'_, SqliteStorage>, SumiError> {
        self.storage.lock().map_err(|_| SumiError::LockPoisoned)
    }
}

fn valid_seeds(seeds: &[String]) -> Vec<Url> {
    seeds
        .iter()
        .filter_map(|seed| match normalize_url(seed) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Skipping seed {}: {}", seed, e);
                None
            }
        })
        .collect()
}
