//! Relevance signals and their normalization
//!
//! Every signal produces one raw value per matched document. Raw values are
//! rescaled into (0, 1] so that 1.0 is always the best document for that
//! signal and signals can be summed with weights.

use crate::query::matcher::DocumentMatch;
use crate::storage::{Storage, StorageResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Guards divisions against zero raw values
pub const EPSILON: f64 = 0.0001;

/// Independent relevance signals a query can combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    /// Number of occurrences of the query terms
    Frequency,

    /// Sum of first-occurrence positions (earlier is better)
    Location,

    /// Sum of gaps between consecutive query terms (closer is better)
    Distance,

    /// Stored link importance score
    PageRank,

    /// Number of link edges pointing at the document
    InboundLinks,

    /// Importance of pages linking here with a query term in the anchor text
    AnchorText,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::Location => "location",
            Self::Distance => "distance",
            Self::PageRank => "pagerank",
            Self::InboundLinks => "inbound-links",
            Self::AnchorText => "anchor-text",
        }
    }

    pub fn all() -> [Self; 6] {
        [
            Self::Frequency,
            Self::Location,
            Self::Distance,
            Self::PageRank,
            Self::InboundLinks,
            Self::AnchorText,
        ]
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|signal| signal.as_str() == s)
            .ok_or_else(|| format!("unknown signal '{}'", s))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How stored rank scores are rescaled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageRankNormalization {
    /// `score / max`: keeps the relative importance of each document
    #[default]
    Relative,

    /// `1 / max` for every document; reproduces scores from legacy indexes exactly
    Legacy,
}

/// Rescales raw values into (0, 1]
///
/// When `small_is_better` is set the best (smallest) value maps to 1.0 and
/// others to `min / value`; otherwise values map to `value / max`. Zero values
/// are clamped to [`EPSILON`] before dividing.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use sumi_index::query::normalize_scores;
///
/// let raw = HashMap::from([(2, 2.0), (4, 4.0), (8, 8.0)]);
/// let normalized = normalize_scores(&raw, true);
/// assert_eq!(normalized[&2], 1.0);
/// assert_eq!(normalized[&4], 0.5);
/// assert_eq!(normalized[&8], 0.25);
/// ```
pub fn normalize_scores(scores: &HashMap<i64, f64>, small_is_better: bool) -> HashMap<i64, f64> {
    if scores.is_empty() {
        return HashMap::new();
    }

    if small_is_better {
        let min = scores
            .values()
            .copied()
            .fold(f64::INFINITY, f64::min)
            .max(EPSILON);
        scores
            .iter()
            .map(|(&id, &value)| (id, min / value.max(EPSILON)))
            .collect()
    } else {
        let mut max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= 0.0 {
            max = EPSILON;
        }
        scores
            .iter()
            .map(|(&id, &value)| (id, value / max))
            .collect()
    }
}

/// Context shared by all signals of one query
pub struct SignalContext<'a> {
    pub storage: &'a dyn Storage,
    pub matches: &'a [DocumentMatch],
    pub term_ids: &'a [i64],
    pub rank_scores: &'a HashMap<i64, f64>,
    pub pagerank_normalization: PageRankNormalization,
}

impl SignalContext<'_> {
    /// Stored rank of a document; unranked documents keep the initial score
    fn rank_of(&self, document_id: i64) -> f64 {
        self.rank_scores.get(&document_id).copied().unwrap_or(1.0)
    }

    /// Computes the normalized values of one signal for every matched document
    pub fn score(&self, signal: Signal) -> StorageResult<HashMap<i64, f64>> {
        let normalized = match signal {
            Signal::Frequency => normalize_scores(&self.frequency(), false),
            Signal::Location => normalize_scores(&self.location(), true),
            Signal::Distance => {
                if self.term_ids.len() < 2 {
                    self.matches.iter().map(|m| (m.document_id, 1.0)).collect()
                } else {
                    normalize_scores(&self.distance(), true)
                }
            }
            Signal::PageRank => self.pagerank(),
            Signal::InboundLinks => normalize_scores(&self.inbound_links()?, false),
            Signal::AnchorText => normalize_scores(&self.anchor_text()?, false),
        };
        Ok(normalized)
    }

    fn frequency(&self) -> HashMap<i64, f64> {
        self.matches
            .iter()
            .map(|m| (m.document_id, m.occurrences as f64))
            .collect()
    }

    fn location(&self) -> HashMap<i64, f64> {
        self.matches
            .iter()
            .map(|m| {
                let sum: u64 = m.positions.iter().map(|&p| u64::from(p)).sum();
                (m.document_id, sum as f64)
            })
            .collect()
    }

    fn distance(&self) -> HashMap<i64, f64> {
        self.matches
            .iter()
            .map(|m| {
                let gaps: u64 = m
                    .positions
                    .windows(2)
                    .map(|pair| u64::from(pair[0].abs_diff(pair[1])))
                    .sum();
                (m.document_id, gaps as f64)
            })
            .collect()
    }

    fn pagerank(&self) -> HashMap<i64, f64> {
        let raw: HashMap<i64, f64> = self
            .matches
            .iter()
            .map(|m| (m.document_id, self.rank_of(m.document_id)))
            .collect();

        match self.pagerank_normalization {
            PageRankNormalization::Relative => normalize_scores(&raw, false),
            PageRankNormalization::Legacy => {
                let mut max = raw.values().copied().fold(f64::NEG_INFINITY, f64::max);
                if max <= 0.0 {
                    max = EPSILON;
                }
                raw.keys().map(|&id| (id, 1.0 / max)).collect()
            }
        }
    }

    fn inbound_links(&self) -> StorageResult<HashMap<i64, f64>> {
        let mut counts = HashMap::new();
        for m in self.matches {
            let inbound = self.storage.get_incoming_links(m.document_id)?.len();
            counts.insert(m.document_id, inbound as f64);
        }
        Ok(counts)
    }

    fn anchor_text(&self) -> StorageResult<HashMap<i64, f64>> {
        let mut totals: HashMap<i64, f64> =
            self.matches.iter().map(|m| (m.document_id, 0.0)).collect();

        for &term_id in self.term_ids {
            for link in self.storage.links_with_anchor_term(term_id)? {
                if let Some(total) = totals.get_mut(&link.to_document_id) {
                    *total += self.rank_of(link.from_document_id);
                }
            }
        }

        Ok(totals)
    }
}
