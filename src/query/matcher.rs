//! Conjunctive matching of query terms against the inverted index

use crate::storage::{Storage, StorageResult};
use std::collections::HashMap;

/// A document containing every resolved query term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMatch {
    pub document_id: i64,

    /// First position of each query term, in query order
    pub positions: Vec<u32>,

    /// Total postings of the query terms in this document
    pub occurrences: usize,
}

/// First position and occurrence count of one term in one document
#[derive(Debug, Clone, Copy)]
struct TermHits {
    first_position: u32,
    count: usize,
}

/// Finds the documents that contain all of `term_ids`
///
/// Produces one position vector per document (the first occurrence of each
/// term) instead of every combination of positions. Matches are returned in
/// ascending document id order.
pub fn match_documents(
    storage: &dyn Storage,
    term_ids: &[i64],
) -> StorageResult<Vec<DocumentMatch>> {
    if term_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut per_term = Vec::with_capacity(term_ids.len());
    for &term_id in term_ids {
        per_term.push(term_hits(storage, term_id)?);
    }

    let mut candidates: Vec<i64> = per_term[0]
        .keys()
        .copied()
        .filter(|id| per_term[1..].iter().all(|hits| hits.contains_key(id)))
        .collect();
    candidates.sort_unstable();

    let matches = candidates
        .into_iter()
        .map(|document_id| {
            let hits: Vec<TermHits> = per_term.iter().map(|term| term[&document_id]).collect();
            DocumentMatch {
                document_id,
                positions: hits.iter().map(|h| h.first_position).collect(),
                occurrences: hits.iter().map(|h| h.count).sum(),
            }
        })
        .collect();

    Ok(matches)
}

fn term_hits(storage: &dyn Storage, term_id: i64) -> StorageResult<HashMap<i64, TermHits>> {
    let mut hits: HashMap<i64, TermHits> = HashMap::new();

    for posting in storage.postings_for_term(term_id)? {
        hits.entry(posting.document_id)
            .and_modify(|h| {
                h.first_position = h.first_position.min(posting.position);
                h.count += 1;
            })
            .or_insert(TermHits {
                first_position: posting.position,
                count: 1,
            });
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::index_document;
    use crate::storage::{IdKind, SqliteStorage};

    fn term(storage: &SqliteStorage, word: &str) -> i64 {
        storage.lookup(IdKind::Term, word).unwrap().unwrap()
    }

    #[test]
    fn test_conjunctive_match() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        index_document(&mut storage, "https://a.test/", "quick brown fox", &[]).unwrap();
        index_document(&mut storage, "https://b.test/", "quick rabbit", &[]).unwrap();
        index_document(&mut storage, "https://c.test/", "fox quick fox", &[]).unwrap();

        let ids = [term(&storage, "quick"), term(&storage, "fox")];
        let matches = match_documents(&storage, &ids).unwrap();

        assert_eq!(
            matches,
            vec![
                DocumentMatch {
                    document_id: 1,
                    positions: vec![0, 2],
                    occurrences: 2,
                },
                DocumentMatch {
                    document_id: 3,
                    positions: vec![1, 0],
                    occurrences: 3,
                },
            ]
        );
    }

    #[test]
    fn test_no_terms_no_matches() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(match_documents(&storage, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_term_match() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        index_document(&mut storage, "https://a.test/", "alpha beta alpha", &[]).unwrap();

        let matches = match_documents(&storage, &[term(&storage, "alpha")]).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].positions, vec![0]);
        assert_eq!(matches[0].occurrences, 2);
    }
}
