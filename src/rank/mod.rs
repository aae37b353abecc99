//! Rank engine computing link-based importance scores
//!
//! Scores are recomputed wholesale from the stored link graph and written back
//! in a single transaction, so a failed run leaves the previous scores intact.

mod graph;

pub use graph::LinkGraph;

use crate::storage::Storage;
use crate::SumiError;
use std::collections::HashMap;
use std::time::Instant;

/// Parameters of the importance computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    /// Weight given to inherited importance
    pub damping: f64,

    /// Score every document receives regardless of its links
    pub base: f64,

    /// Number of full passes over the documents
    pub iterations: u32,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            damping: 0.85,
            base: 0.15,
            iterations: 20,
        }
    }
}

/// Recomputes the rank score of every document
///
/// The caller must hold exclusive access to `storage` for the whole call so the
/// link graph cannot change mid-pass.
///
/// # Arguments
///
/// * `storage` - The storage backend holding the link graph
/// * `params` - Damping, base score and iteration count
///
/// # Returns
///
/// * `Ok(HashMap)` - The committed score of every document
/// * `Err(SumiError)` - A storage failure; previous scores are untouched
pub fn compute_ranks(
    storage: &mut dyn Storage,
    params: &RankParams,
) -> Result<HashMap<i64, f64>, SumiError> {
    let start_time = Instant::now();

    let document_ids = storage.document_ids()?;
    let edges = storage.link_edges()?;
    tracing::info!(
        "Computing ranks for {} documents over {} links ({} iterations)",
        document_ids.len(),
        edges.len(),
        params.iterations
    );

    let graph = LinkGraph::from_edges(&document_ids, &edges);
    let scores = graph.rank(params);

    storage.replace_rank_scores(&scores)?;

    tracing::info!("Rank computation completed in {:?}", start_time.elapsed());
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::{index_document, OutboundLink};
    use crate::storage::SqliteStorage;

    #[test]
    fn test_default_params() {
        let params = RankParams::default();
        assert_eq!(params.damping, 0.85);
        assert_eq!(params.base, 0.15);
        assert_eq!(params.iterations, 20);
    }

    #[test]
    fn test_compute_ranks_persists_scores() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        index_document(
            &mut storage,
            "https://a.test/",
            "a",
            &[OutboundLink::new("https://b.test/", "")],
        )
        .unwrap();
        index_document(
            &mut storage,
            "https://b.test/",
            "b",
            &[OutboundLink::new("https://c.test/", "")],
        )
        .unwrap();
        index_document(
            &mut storage,
            "https://c.test/",
            "c",
            &[OutboundLink::new("https://a.test/", "")],
        )
        .unwrap();

        let scores = compute_ranks(&mut storage, &RankParams::default()).unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores.values().all(|&s| s == 1.0));

        let stored = storage.load_rank_scores().unwrap();
        assert_eq!(stored, scores);
    }

    #[test]
    fn test_compute_ranks_with_zero_iterations() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        index_document(
            &mut storage,
            "https://a.test/",
            "a",
            &[OutboundLink::new("https://b.test/", "")],
        )
        .unwrap();

        let params = RankParams {
            iterations: 0,
            ..RankParams::default()
        };
        let scores = compute_ranks(&mut storage, &params).unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores.values().all(|&s| s == 1.0));
    }

    #[test]
    fn test_compute_ranks_replaces_previous_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        index_document(
            &mut storage,
            "https://a.test/",
            "a",
            &[OutboundLink::new("https://b.test/", "")],
        )
        .unwrap();

        compute_ranks(&mut storage, &RankParams::default()).unwrap();
        index_document(&mut storage, "https://c.test/", "c", &[]).unwrap();
        let scores = compute_ranks(&mut storage, &RankParams::default()).unwrap();

        assert_eq!(scores.len(), 3);
        assert_eq!(storage.count_rank_scores().unwrap(), 3);
    }
}
