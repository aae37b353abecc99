//! Indexer for turning extracted page content into postings and links
//!
//! This module handles:
//! - Tokenizing page text into positioned terms
//! - Tokenizing anchor text of outbound links
//! - Committing a page's postings and link edges atomically

mod tokenizer;

pub use tokenizer::{anchor_terms, indexable_terms, is_stop_word, separate_words, STOP_WORDS};

use crate::storage::{CommitOutcome, NewDocument, NewLink, Storage, StorageError};
use thiserror::Error;

/// Errors that can occur while indexing a document
#[derive(Debug, Error)]
#[error("Failed to index {url}: {source}")]
pub struct IndexingError {
    pub url: String,
    #[source]
    pub source: StorageError,
}

/// An outbound link of a page, already resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    pub target_url: String,
    pub anchor_text: String,
}

impl OutboundLink {
    pub fn new(target_url: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            anchor_text: anchor_text.into(),
        }
    }
}

/// What `index_document` did with a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The URL had already been indexed; nothing changed
    AlreadyIndexed { document_id: i64 },

    /// The page was indexed
    Indexed {
        document_id: i64,
        /// Number of postings written
        postings: usize,
        /// Number of link edges written (self-loops excluded)
        links: usize,
    },
}

impl From<CommitOutcome> for IndexOutcome {
    fn from(outcome: CommitOutcome) -> Self {
        match outcome {
            CommitOutcome::AlreadyIndexed { document_id } => Self::AlreadyIndexed { document_id },
            CommitOutcome::Committed {
                document_id,
                postings,
                links,
            } => Self::Indexed {
                document_id,
                postings,
                links,
            },
        }
    }
}

/// Indexes one page
///
/// Records a posting for every non-stop-word token of `text` and a link edge
/// (with its anchor terms) for every outbound link that does not point back at
/// the page itself. Indexing a URL a second time is a no-op. Everything for
/// the page is committed in one transaction, so a failure leaves no trace.
///
/// # Arguments
///
/// * `storage` - The storage backend to write to
/// * `url` - URL of the page being indexed
/// * `text` - Text-only content of the page
/// * `links` - Outbound links of the page
///
/// # Returns
///
/// * `Ok(IndexOutcome)` - The page was indexed or skipped
/// * `Err(IndexingError)` - The storage layer failed; nothing was written
pub fn index_document(
    storage: &mut dyn Storage,
    url: &str,
    text: &str,
    links: &[OutboundLink],
) -> Result<IndexOutcome, IndexingError> {
    let wrap = |source: StorageError| IndexingError {
        url: url.to_string(),
        source,
    };

    if let Some(existing) = storage.get_document_by_url(url).map_err(wrap)? {
        if existing.is_indexed() {
            tracing::debug!("Skipping {}: already indexed", url);
            return Ok(IndexOutcome::AlreadyIndexed {
                document_id: existing.id,
            });
        }
    }

    tracing::debug!("Indexing {}", url);

    let document = NewDocument {
        url: url.to_string(),
        postings: indexable_terms(text),
        links: links
            .iter()
            .map(|link| NewLink {
                target_url: link.target_url.clone(),
                anchor_terms: anchor_terms(&link.anchor_text),
            })
            .collect(),
    };

    let outcome = storage.commit_document(&document).map_err(wrap)?;
    Ok(outcome.into())
}
