//! Query engine for ranked multi-term search
//!
//! This module handles:
//! - Splitting a query into words and resolving them to terms
//! - Conjunctive matching of documents against all resolved terms
//! - Computing, normalizing and combining relevance signals
//! - Returning the top-scoring documents with their URLs

mod matcher;
mod signals;

pub use matcher::{match_documents, DocumentMatch};
pub use signals::{normalize_scores, PageRankNormalization, Signal, SignalContext, EPSILON};

use crate::storage::{IdKind, Storage};
use crate::SumiError;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// Errors in the query itself
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query is empty")]
    Empty,
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub document_id: i64,
    pub url: String,
    pub score: f64,
}

/// Controls which signals are combined and how many hits are returned
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Signals to combine with their weights
    pub weights: Vec<(Signal, f64)>,

    /// Maximum number of hits
    pub limit: usize,

    pub pagerank_normalization: PageRankNormalization,
}

impl SearchOptions {
    /// Frequency, location and pagerank, weighted equally
    pub fn default_weights() -> Vec<(Signal, f64)> {
        vec![
            (Signal::Frequency, 1.0),
            (Signal::Location, 1.0),
            (Signal::PageRank, 1.0),
        ]
    }

    pub fn with_weights(mut self, weights: Vec<(Signal, f64)>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            weights: Self::default_weights(),
            limit: 10,
            pagerank_normalization: PageRankNormalization::default(),
        }
    }
}

/// Splits a query into lower-cased words
///
/// The query is split on single spaces without trimming, so consecutive spaces
/// produce empty words that simply never resolve to a term.
pub fn parse_query(query: &str) -> Result<Vec<String>, QueryError> {
    if query.is_empty() {
        return Err(QueryError::Empty);
    }

    Ok(query.split(' ').map(str::to_lowercase).collect())
}

/// Resolves query words to term ids, dropping unknown words and repeats
fn resolve_terms(storage: &dyn Storage, words: &[String]) -> Result<Vec<i64>, SumiError> {
    let mut term_ids = Vec::new();
    for word in words {
        match storage.lookup(IdKind::Term, word)? {
            Some(id) if !term_ids.contains(&id) => term_ids.push(id),
            Some(_) => {}
            None => tracing::debug!("Query word '{}' is not in the index", word),
        }
    }
    Ok(term_ids)
}

/// Scores every document matching the query, best first
///
/// Unlike [`search`], the result is not truncated and URLs are not resolved.
pub fn score_documents(
    storage: &dyn Storage,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<(i64, f64)>, SumiError> {
    let words = parse_query(query)?;
    let term_ids = resolve_terms(storage, &words)?;
    if term_ids.is_empty() {
        return Ok(Vec::new());
    }

    let matches = match_documents(storage, &term_ids)?;
    if matches.is_empty() {
        return Ok(Vec::new());
    }

    let rank_scores = storage.load_rank_scores()?;
    let context = SignalContext {
        storage,
        matches: &matches,
        term_ids: &term_ids,
        rank_scores: &rank_scores,
        pagerank_normalization: options.pagerank_normalization,
    };

    let mut totals: HashMap<i64, f64> = matches.iter().map(|m| (m.document_id, 0.0)).collect();
    for &(signal, weight) in &options.weights {
        for (document_id, value) in context.score(signal)? {
            if let Some(total) = totals.get_mut(&document_id) {
                *total += weight * value;
            }
        }
    }

    // Matches are in ascending id order and the sort is stable, so ties keep that order
    let mut ranked: Vec<(i64, f64)> = matches
        .iter()
        .map(|m| (m.document_id, totals[&m.document_id]))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    Ok(ranked)
}

/// Runs a ranked search
///
/// Documents must contain every query word that exists in the index; words
/// that do not exist are ignored. An empty query is logged and yields no hits.
///
/// # Arguments
///
/// * `storage` - The storage backend to read from
/// * `query` - Space-separated query words
/// * `options` - Signal weights and result limit
///
/// # Returns
///
/// * `Ok(Vec<SearchHit>)` - At most `options.limit` hits by descending score
/// * `Err(SumiError)` - A storage failure
///
/// # Example
///
/// ```
/// use sumi_index::indexer::index_document;
/// use sumi_index::query::{search, SearchOptions};
/// use sumi_index::storage::SqliteStorage;
///
/// let mut storage = SqliteStorage::new_in_memory().unwrap();
/// index_document(&mut storage, "https://example.com/", "quick brown fox", &[]).unwrap();
///
/// let hits = search(&storage, "quick fox", &SearchOptions::default()).unwrap();
/// assert_eq!(hits[0].url, "https://example.com/");
/// ```
pub fn search(
    storage: &dyn Storage,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchHit>, SumiError> {
    let ranked = match score_documents(storage, query, options) {
        Ok(ranked) => ranked,
        Err(SumiError::Query(e)) => {
            tracing::warn!("Ignoring query {:?}: {}", query, e);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut hits = Vec::with_capacity(ranked.len().min(options.limit));
    for (document_id, score) in ranked.into_iter().take(options.limit) {
        let document = storage.get_document(document_id)?;
        hits.push(SearchHit {
            document_id,
            url: document.url,
            score,
        });
    }

    tracing::debug!("Query {:?} returned {} hits", query, hits.len());
    Ok(hits)
}
