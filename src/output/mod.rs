//! Output module for presenting results on the terminal
//!
//! This module handles:
//! - Formatting ranked search results
//! - Summarizing a finished crawl
//! - Recording index statistics

pub mod stats;

pub use stats::{load_statistics, print_statistics, IndexStatistics};

use crate::crawler::CrawlReport;
use crate::query::SearchHit;
use std::fmt::Write;

/// Formats ranked search hits, one per line, best first
///
/// # Example
///
/// ```
/// use sumi_index::output::format_search_results;
/// use sumi_index::SearchHit;
///
/// let hits = vec![SearchHit { document_id: 3, url: "https://a.test/".into(), score: 2.5 }];
/// let text = format_search_results("fox", &hits);
/// assert!(text.contains("2.5000  https://a.test/"));
/// ```
pub fn format_search_results(query: &str, hits: &[SearchHit]) -> String {
    let mut out = String::new();

    if hits.is_empty() {
        let _ = writeln!(out, "No results for \"{}\"", query);
        return out;
    }

    let _ = writeln!(out, "Results for \"{}\" ({}):", query, hits.len());
    for (rank, hit) in hits.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {:.4}  {}", rank + 1, hit.score, hit.url);
    }
    out
}

/// Prints ranked search hits to stdout
pub fn print_search_results(query: &str, hits: &[SearchHit]) {
    print!("{}", format_search_results(query, hits));
}

/// Formats the counts of a finished crawl
pub fn format_crawl_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Crawl Summary ===");
    let _ = writeln!(out, "  Rounds: {}", report.rounds);
    let _ = writeln!(out, "  Pages fetched: {}", report.fetched);
    let _ = writeln!(out, "  Pages indexed: {}", report.indexed);
    let _ = writeln!(out, "  Already indexed: {}", report.already_indexed);
    let _ = writeln!(out, "  Fetch failures: {}", report.fetch_failures);
    let _ = writeln!(out, "  Indexing failures: {}", report.index_failures);
    out
}

pub fn print_crawl_report(report: &CrawlReport) {
    print!("{}", format_crawl_report(report));
}
