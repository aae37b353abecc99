//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Sumi-Index database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every URL ever seen, indexed or not
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    indexed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_documents_url ON documents(url);

-- Vocabulary of normalized terms
CREATE TABLE IF NOT EXISTS terms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_terms_word ON terms(word);

-- One row per term occurrence
CREATE TABLE IF NOT EXISTS postings (
    document_id INTEGER NOT NULL REFERENCES documents(id),
    term_id INTEGER NOT NULL REFERENCES terms(id),
    position INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_postings_term ON postings(term_id);
CREATE INDEX IF NOT EXISTS idx_postings_document ON postings(document_id);

-- Link graph; duplicate pairs are allowed and weight the edge
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_document_id INTEGER NOT NULL REFERENCES documents(id),
    to_document_id INTEGER NOT NULL REFERENCES documents(id),
    CHECK (from_document_id <> to_document_id)
);

CREATE INDEX IF NOT EXISTS idx_links_from ON links(from_document_id);
CREATE INDEX IF NOT EXISTS idx_links_to ON links(to_document_id);

-- Anchor text terms of each link
CREATE TABLE IF NOT EXISTS link_terms (
    link_id INTEGER NOT NULL REFERENCES links(id),
    term_id INTEGER NOT NULL REFERENCES terms(id)
);

CREATE INDEX IF NOT EXISTS idx_link_terms_term ON link_terms(term_id);
CREATE INDEX IF NOT EXISTS idx_link_terms_link ON link_terms(link_id);

-- Derived importance scores, replaced wholesale by each ranking run
CREATE TABLE IF NOT EXISTS rank_scores (
    document_id INTEGER PRIMARY KEY REFERENCES documents(id),
    score REAL NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
