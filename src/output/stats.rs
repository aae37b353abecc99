//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::Storage;
use crate::SumiError;

/// Number of top-ranked documents listed in the statistics
const TOP_RANKED: usize = 5;

/// Index statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStatistics {
    /// Documents known to the index, crawled or only linked to
    pub total_documents: u64,

    /// Documents whose content has been indexed
    pub indexed_documents: u64,

    /// Distinct terms
    pub total_terms: u64,

    /// Term occurrences
    pub total_postings: u64,

    /// Link edges between documents
    pub total_links: u64,

    /// Documents with a stored rank score
    pub ranked_documents: u64,

    /// Highest-ranked documents with their scores, best first
    pub top_ranked: Vec<(String, f64)>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(SumiError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<IndexStatistics, SumiError> {
    let mut ranked: Vec<(i64, f64)> = storage.load_rank_scores()?.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut top_ranked = Vec::with_capacity(TOP_RANKED);
    for (document_id, score) in ranked.into_iter().take(TOP_RANKED) {
        let document = storage.get_document(document_id)?;
        top_ranked.push((document.url, score));
    }

    Ok(IndexStatistics {
        total_documents: storage.count_documents()?,
        indexed_documents: storage.count_indexed_documents()?,
        total_terms: storage.count_terms()?,
        total_postings: storage.count_postings()?,
        total_links: storage.count_links()?,
        ranked_documents: storage.count_rank_scores()?,
        top_ranked,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Documents known: {}", stats.total_documents);
    println!("  Documents indexed: {}", stats.indexed_documents);
    println!("  Distinct terms: {}", stats.total_terms);
    println!("  Postings: {}", stats.total_postings);
    println!("  Links: {}", stats.total_links);
    println!("  Ranked documents: {}", stats.ranked_documents);
    println!();

    if !stats.top_ranked.is_empty() {
        println!("Top Ranked:");
        for (url, score) in &stats.top_ranked {
            println!("  {:.4}  {}", score, url);
        }
        println!();
    }

    let coverage = if stats.total_documents > 0 {
        (stats.indexed_documents as f64 / stats.total_documents as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Coverage: {:.1}% ({} / {} known documents indexed)",
        coverage, stats.indexed_documents, stats.total_documents
    );
}
