//! In-memory link graph used for rank computation

use crate::rank::RankParams;
use crate::storage::LinkRecord;
use std::collections::HashMap;

/// Link graph over a dense, ascending list of documents
#[derive(Debug, Clone)]
pub struct LinkGraph {
    /// Document ids in ascending order
    ids: Vec<i64>,

    /// For each document, the indices of its predecessors (one entry per edge)
    incoming: Vec<Vec<usize>>,

    /// Number of outbound edges per document, duplicates included
    outdegree: Vec<u32>,
}

impl LinkGraph {
    /// Builds a graph from document ids and link edges
    ///
    /// Edges that reference an unknown document are ignored.
    pub fn from_edges(document_ids: &[i64], edges: &[LinkRecord]) -> Self {
        let mut ids = document_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let index: HashMap<i64, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut incoming = vec![Vec::new(); ids.len()];
        let mut outdegree = vec![0u32; ids.len()];

        for edge in edges {
            let (Some(&from), Some(&to)) = (
                index.get(&edge.from_document_id),
                index.get(&edge.to_document_id),
            ) else {
                tracing::debug!(
                    "Ignoring edge {} with unknown endpoint {} -> {}",
                    edge.id,
                    edge.from_document_id,
                    edge.to_document_id
                );
                continue;
            };

            incoming[to].push(from);
            outdegree[from] += 1;
        }

        Self {
            ids,
            incoming,
            outdegree,
        }
    }

    /// Number of documents in the graph
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of outbound edges of a document
    pub fn outdegree(&self, document_id: i64) -> Option<u32> {
        self.ids
            .binary_search(&document_id)
            .ok()
            .map(|i| self.outdegree[i])
    }

    /// Runs the iterative importance computation
    ///
    /// Every score starts at 1.0. Each pass visits documents in ascending id
    /// order and overwrites the score in place, so predecessors with a smaller
    /// id contribute the value already updated in the same pass while larger
    /// ids still hold the previous pass's value. Dangling mass is not
    /// redistributed.
    pub fn rank(&self, params: &RankParams) -> HashMap<i64, f64> {
        let mut scores = vec![1.0_f64; self.ids.len()];

        for _ in 0..params.iterations {
            for d in 0..self.ids.len() {
                let inherited: f64 = self.incoming[d]
                    .iter()
                    .map(|&l| scores[l] / f64::from(self.outdegree[l]))
                    .sum();
                scores[d] = params.base + params.damping * inherited;
            }
        }

        self.ids.iter().copied().zip(scores).collect()
    }
}
