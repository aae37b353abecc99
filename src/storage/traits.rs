//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{CommitOutcome, DocumentRecord, IdKind, LinkRecord, NewDocument, PostingRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the indexer, the rank
/// engine and the query engine. Callers share a backend behind a mutex, so
/// implementations only need to be `Send`.
pub trait Storage {
    // ===== Document Store =====

    /// Returns the id for `value` in the given namespace, creating it if needed
    ///
    /// Repeated calls with the same value return the same id.
    fn get_or_create(&mut self, kind: IdKind, value: &str) -> StorageResult<i64>;

    /// Looks up the id for `value` without creating it
    fn lookup(&self, kind: IdKind, value: &str) -> StorageResult<Option<i64>>;

    /// Gets a document by ID
    fn get_document(&self, document_id: i64) -> StorageResult<DocumentRecord>;

    /// Gets a document by URL
    fn get_document_by_url(&self, url: &str) -> StorageResult<Option<DocumentRecord>>;

    /// Returns every document id in ascending order
    fn document_ids(&self) -> StorageResult<Vec<i64>>;

    /// Returns true if postings and links for `url` have been committed
    fn is_indexed(&self, url: &str) -> StorageResult<bool>;

    // ===== Indexing =====

    /// Commits a tokenized document atomically
    ///
    /// Either every posting, link and anchor term of the document becomes
    /// visible, or none does. A URL that is already indexed is left untouched.
    fn commit_document(&mut self, document: &NewDocument) -> StorageResult<CommitOutcome>;

    // ===== Postings =====

    /// Gets all postings of a term, ordered by document id then position
    fn postings_for_term(&self, term_id: i64) -> StorageResult<Vec<PostingRecord>>;

    /// Gets all postings of a document, ordered by position
    fn postings_for_document(&self, document_id: i64) -> StorageResult<Vec<PostingRecord>>;

    // ===== Link Graph =====

    /// Gets every link edge, ordered by edge id
    fn link_edges(&self) -> StorageResult<Vec<LinkRecord>>;

    /// Gets all outgoing links from a document
    fn get_outgoing_links(&self, document_id: i64) -> StorageResult<Vec<LinkRecord>>;

    /// Gets all incoming links to a document
    fn get_incoming_links(&self, document_id: i64) -> StorageResult<Vec<LinkRecord>>;

    /// Gets the links whose anchor text contains the given term
    fn links_with_anchor_term(&self, term_id: i64) -> StorageResult<Vec<LinkRecord>>;

    /// Gets the anchor terms of a link
    fn get_anchor_terms(&self, link_id: i64) -> StorageResult<Vec<String>>;

    // ===== Rank Scores =====

    /// Replaces the full rank score set in one transaction
    fn replace_rank_scores(&mut self, scores: &HashMap<i64, f64>) -> StorageResult<()>;

    /// Loads every stored rank score
    fn load_rank_scores(&self) -> StorageResult<HashMap<i64, f64>>;

    // ===== Statistics =====

    /// Gets total document count
    fn count_documents(&self) -> StorageResult<u64>;

    /// Counts documents whose content has been indexed
    fn count_indexed_documents(&self) -> StorageResult<u64>;

    /// Counts distinct terms
    fn count_terms(&self) -> StorageResult<u64>;

    /// Counts postings
    fn count_postings(&self) -> StorageResult<u64>;

    /// Counts the total number of links
    fn count_links(&self) -> StorageResult<u64>;

    /// Counts stored rank scores
    fn count_rank_scores(&self) -> StorageResult<u64>;
}
