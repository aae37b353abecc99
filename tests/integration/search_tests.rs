//! Integration tests for indexing, ranking and searching
//!
//! These tests drive the public library API against a file-backed index.

use std::path::Path;
use sumi_index::indexer::OutboundLink;
use sumi_index::query::PageRankNormalization;
use sumi_index::storage::{open_storage, SqliteStorage, Storage};
use sumi_index::{
    compute_ranks, index_document, search, IndexOutcome, RankParams, SearchOptions, Signal,
};
use tempfile::TempDir;

/// Builds a small linked site:
///
/// - home links to guide and faq
/// - guide links to faq
/// - faq links to nothing
fn build_site(storage: &mut SqliteStorage) {
    index_document(
        storage,
        "https://site.test/",
        "Welcome. Read the setup guide or the questions page.",
        &[
            OutboundLink::new("https://site.test/guide", "setup guide"),
            OutboundLink::new("https://site.test/faq", "questions"),
        ],
    )
    .expect("index home");

    index_document(
        storage,
        "https://site.test/guide",
        "The setup guide explains installing the tool and running the setup wizard.",
        &[OutboundLink::new("https://site.test/faq", "common setup questions")],
    )
    .expect("index guide");

    index_document(
        storage,
        "https://site.test/faq",
        "Common questions about installing. Setup problems are usually permissions.",
        &[],
    )
    .expect("index faq");
}

fn open_index(dir: &TempDir) -> SqliteStorage {
    open_storage(&dir.path().join("index.db")).expect("Failed to open storage")
}

#[test]
fn test_index_rank_search_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut storage = open_index(&dir);
    build_site(&mut storage);

    let scores = compute_ranks(&mut storage, &RankParams::default()).unwrap();
    assert_eq!(scores.len(), 3);
    // The faq has the most incoming links
    let faq_id = storage
        .get_document_by_url("https://site.test/faq")
        .unwrap()
        .unwrap()
        .id;
    let best = scores
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(id, _)| *id)
        .unwrap();
    assert_eq!(best, faq_id);

    let hits = search(&storage, "setup", &SearchOptions::default()).unwrap();
    assert_eq!(hits.len(), 3);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let hits = search(&storage, "installing setup", &SearchOptions::default()).unwrap();
    let urls: Vec<_> = hits.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls.contains(&"https://site.test/guide"));
    assert!(urls.contains(&"https://site.test/faq"));
}

#[test]
fn test_index_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut storage = open_index(&dir);
        build_site(&mut storage);
        compute_ranks(&mut storage, &RankParams::default()).unwrap();
    }

    let mut storage = open_index(&dir);
    assert_eq!(storage.count_indexed_documents().unwrap(), 3);
    assert_eq!(storage.count_rank_scores().unwrap(), 3);

    let outcome = index_document(&mut storage, "https://site.test/faq", "different text", &[]).unwrap();
    assert!(matches!(outcome, IndexOutcome::AlreadyIndexed { .. }));

    let hits = search(&storage, "permissions", &SearchOptions::default()).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://site.test/faq");
}

#[test]
fn test_unknown_and_empty_queries_return_nothing() {
    let dir = TempDir::new().unwrap();
    let mut storage = open_index(&dir);
    build_site(&mut storage);

    assert!(search(&storage, "zebra", &SearchOptions::default())
        .unwrap()
        .is_empty());
    assert!(search(&storage, "", &SearchOptions::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_anchor_text_signal_favors_linked_target() {
    let dir = TempDir::new().unwrap();
    let mut storage = open_index(&dir);
    build_site(&mut storage);

    let options = SearchOptions::default().with_weights(vec![(Signal::AnchorText, 1.0)]);
    let hits = search(&storage, "questions", &options).unwrap();

    // Both home and faq contain the word; only faq is linked with it
    assert_eq!(hits[0].url, "https://site.test/faq");
    assert_eq!(hits[0].score, 1.0);
}

#[test]
fn test_limit_and_custom_weights() {
    let dir = TempDir::new().unwrap();
    let mut storage = open_index(&dir);
    build_site(&mut storage);
    compute_ranks(&mut storage, &RankParams::default()).unwrap();

    let options = SearchOptions {
        weights: vec![(Signal::PageRank, 1.0), (Signal::InboundLinks, 2.0)],
        limit: 1,
        pagerank_normalization: PageRankNormalization::Legacy,
    };
    let hits = search(&storage, "setup", &options).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://site.test/faq");
}
