//! Storage module for persisting the index
//!
//! This module handles all database operations for the engine, including:
//! - SQLite database initialization and schema management
//! - Identifier assignment for URLs and terms
//! - Posting and link graph persistence
//! - Wholesale replacement of rank scores

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{init_database, SqliteStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::SumiError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SumiError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SumiError> {
    SqliteStorage::new(path)
}

/// Identifier namespaces managed by the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// Document URLs
    Url,
    /// Normalized index terms
    Term,
}

impl IdKind {
    /// Table holding this namespace
    pub fn table(&self) -> &'static str {
        match self {
            Self::Url => "documents",
            Self::Term => "terms",
        }
    }

    /// Natural-key column of this namespace
    pub fn column(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Term => "word",
        }
    }
}

/// Represents a document in the database
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: i64,
    pub url: String,
    /// Set once the document's postings and links have been committed
    pub indexed_at: Option<String>,
}

impl DocumentRecord {
    pub fn is_indexed(&self) -> bool {
        self.indexed_at.is_some()
    }
}

/// Represents a single term occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingRecord {
    pub document_id: i64,
    pub term_id: i64,
    pub position: u32,
}

/// Represents a link edge between documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: i64,
    pub from_document_id: i64,
    pub to_document_id: i64,
}

/// An outbound link waiting to be committed with its source document
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub target_url: String,
    /// Stop-word-filtered anchor tokens
    pub anchor_terms: Vec<String>,
}

/// Everything produced by tokenizing one page, committed in a single transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub url: String,
    /// (term, position) pairs in document order
    pub postings: Vec<(String, u32)>,
    pub links: Vec<NewLink>,
}

/// Result of committing a [`NewDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The URL was indexed before; nothing was written
    AlreadyIndexed { document_id: i64 },

    /// Postings and links were written
    Committed {
        document_id: i64,
        postings: usize,
        links: usize,
    },
}
