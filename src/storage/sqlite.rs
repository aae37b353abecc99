//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    CommitOutcome, DocumentRecord, IdKind, LinkRecord, NewDocument, PostingRecord,
};
use crate::SumiError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SumiError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SumiError> {
        let conn = init_database(path)?;
        conn.execute_batch(
            "
            PRAGMA temp_store = MEMORY;
            PRAGMA mmap_size = 268435456;
        ",
        )?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database (for tests and throwaway indexes)
    pub fn new_in_memory() -> Result<Self, SumiError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Finds or inserts `value` in the namespace's table
///
/// Callers hold exclusive access to the connection, so the select-then-insert
/// pair cannot race with another writer.
fn get_or_create_id(conn: &Connection, kind: IdKind, value: &str) -> rusqlite::Result<i64> {
    if let Some(id) = lookup_id(conn, kind, value)? {
        return Ok(id);
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES (?1)",
        kind.table(),
        kind.column()
    );
    conn.prepare_cached(&sql)?.execute(params![value])?;
    Ok(conn.last_insert_rowid())
}

fn lookup_id(conn: &Connection, kind: IdKind, value: &str) -> rusqlite::Result<Option<i64>> {
    let sql = format!(
        "SELECT id FROM {} WHERE {} = ?1",
        kind.table(),
        kind.column()
    );
    conn.prepare_cached(&sql)?
        .query_row(params![value], |row| row.get(0))
        .optional()
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        indexed_at: row.get(2)?,
    })
}

fn posting_from_row(row: &Row<'_>) -> rusqlite::Result<PostingRecord> {
    Ok(PostingRecord {
        document_id: row.get(0)?,
        term_id: row.get(1)?,
        position: row.get(2)?,
    })
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<LinkRecord> {
    Ok(LinkRecord {
        id: row.get(0)?,
        from_document_id: row.get(1)?,
        to_document_id: row.get(2)?,
    })
}

impl SqliteStorage {
    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn query_links(&self, sql: &str, id: i64) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let links = stmt
            .query_map(params![id], link_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }
}

impl Storage for SqliteStorage {
    // ===== Document Store =====

    fn get_or_create(&mut self, kind: IdKind, value: &str) -> StorageResult<i64> {
        Ok(get_or_create_id(&self.conn, kind, value)?)
    }

    fn lookup(&self, kind: IdKind, value: &str) -> StorageResult<Option<i64>> {
        Ok(lookup_id(&self.conn, kind, value)?)
    }

    fn get_document(&self, document_id: i64) -> StorageResult<DocumentRecord> {
        self.conn
            .prepare_cached("SELECT id, url, indexed_at FROM documents WHERE id = ?1")?
            .query_row(params![document_id], document_from_row)
            .optional()?
            .ok_or_else(|| StorageError::DocumentNotFound(format!("Document ID {}", document_id)))
    }

    fn get_document_by_url(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let document = self
            .conn
            .prepare_cached("SELECT id, url, indexed_at FROM documents WHERE url = ?1")?
            .query_row(params![url], document_from_row)
            .optional()?;
        Ok(document)
    }

    fn document_ids(&self) -> StorageResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM documents ORDER BY id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn is_indexed(&self, url: &str) -> StorageResult<bool> {
        Ok(self
            .get_document_by_url(url)?
            .map(|doc| doc.is_indexed())
            .unwrap_or(false))
    }

    // ===== Indexing =====

    fn commit_document(&mut self, document: &NewDocument) -> StorageResult<CommitOutcome> {
        let tx = self.conn.transaction()?;

        let document_id = get_or_create_id(&tx, IdKind::Url, &document.url)?;
        let indexed_at: Option<String> = tx.query_row(
            "SELECT indexed_at FROM documents WHERE id = ?1",
            params![document_id],
            |row| row.get(0),
        )?;
        if indexed_at.is_some() {
            return Ok(CommitOutcome::AlreadyIndexed { document_id });
        }

        for (word, position) in &document.postings {
            let term_id = get_or_create_id(&tx, IdKind::Term, word)?;
            tx.prepare_cached(
                "INSERT INTO postings (document_id, term_id, position) VALUES (?1, ?2, ?3)",
            )?
            .execute(params![document_id, term_id, position])?;
        }

        let mut links = 0;
        for link in &document.links {
            let to_document_id = get_or_create_id(&tx, IdKind::Url, &link.target_url)?;
            if to_document_id == document_id {
                continue;
            }

            tx.prepare_cached("INSERT INTO links (from_document_id, to_document_id) VALUES (?1, ?2)")?
                .execute(params![document_id, to_document_id])?;
            let link_id = tx.last_insert_rowid();
            links += 1;

            for word in &link.anchor_terms {
                let term_id = get_or_create_id(&tx, IdKind::Term, word)?;
                tx.prepare_cached("INSERT INTO link_terms (link_id, term_id) VALUES (?1, ?2)")?
                    .execute(params![link_id, term_id])?;
            }
        }

        tx.execute(
            "UPDATE documents SET indexed_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), document_id],
        )?;
        tx.commit()?;

        Ok(CommitOutcome::Committed {
            document_id,
            postings: document.postings.len(),
            links,
        })
    }

    // ===== Postings =====

    fn postings_for_term(&self, term_id: i64) -> StorageResult<Vec<PostingRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT document_id, term_id, position FROM postings
             WHERE term_id = ?1 ORDER BY document_id ASC, position ASC",
        )?;
        let postings = stmt
            .query_map(params![term_id], posting_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(postings)
    }

    fn postings_for_document(&self, document_id: i64) -> StorageResult<Vec<PostingRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT document_id, term_id, position FROM postings
             WHERE document_id = ?1 ORDER BY position ASC",
        )?;
        let postings = stmt
            .query_map(params![document_id], posting_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(postings)
    }

    // ===== Link Graph =====

    fn link_edges(&self) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, from_document_id, to_document_id FROM links ORDER BY id ASC")?;
        let links = stmt
            .query_map([], link_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn get_outgoing_links(&self, document_id: i64) -> StorageResult<Vec<LinkRecord>> {
        self.query_links(
            "SELECT id, from_document_id, to_document_id FROM links
             WHERE from_document_id = ?1 ORDER BY id ASC",
            document_id,
        )
    }

    fn get_incoming_links(&self, document_id: i64) -> StorageResult<Vec<LinkRecord>> {
        self.query_links(
            "SELECT id, from_document_id, to_document_id FROM links
             WHERE to_document_id = ?1 ORDER BY id ASC",
            document_id,
        )
    }

    fn links_with_anchor_term(&self, term_id: i64) -> StorageResult<Vec<LinkRecord>> {
        self.query_links(
            "SELECT links.id, links.from_document_id, links.to_document_id
             FROM link_terms JOIN links ON links.id = link_terms.link_id
             WHERE link_terms.term_id = ?1 ORDER BY links.id ASC",
            term_id,
        )
    }

    fn get_anchor_terms(&self, link_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT terms.word FROM link_terms JOIN terms ON terms.id = link_terms.term_id
             WHERE link_terms.link_id = ?1 ORDER BY link_terms.rowid ASC",
        )?;
        let words = stmt
            .query_map(params![link_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }

    // ===== Rank Scores =====

    fn replace_rank_scores(&mut self, scores: &HashMap<i64, f64>) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM rank_scores", [])?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO rank_scores (document_id, score) VALUES (?1, ?2)")?;
            for (document_id, score) in scores {
                stmt.execute(params![document_id, score])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_rank_scores(&self) -> StorageResult<HashMap<i64, f64>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT document_id, score FROM rank_scores")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)))?;

        let mut scores = HashMap::new();
        for row in rows {
            let (document_id, score) = row?;
            scores.insert(document_id, score);
        }

        Ok(scores)
    }

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM documents")
    }

    fn count_indexed_documents(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM documents WHERE indexed_at IS NOT NULL")
    }

    fn count_terms(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM terms")
    }

    fn count_postings(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM postings")
    }

    fn count_links(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM links")
    }

    fn count_rank_scores(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM rank_scores")
    }
}

/// Initializes or opens a database at the given path
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(Connection)` - Successfully opened/created database
/// * `Err(rusqlite::Error)` - Failed to open database
pub fn init_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}
