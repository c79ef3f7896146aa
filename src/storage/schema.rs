//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Site-Health database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per crawl invocation
CREATE TABLE IF NOT EXISTS crawls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_url TEXT NOT NULL,
    started_at TEXT NOT NULL,
    completed_at TEXT,
    max_depth INTEGER,
    total_pages INTEGER DEFAULT 0,
    total_links_checked INTEGER DEFAULT 0,
    status TEXT DEFAULT 'running'
);

-- One row per checked link
CREATE TABLE IF NOT EXISTS link_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    crawl_id INTEGER NOT NULL REFERENCES crawls(id),
    source_url TEXT NOT NULL,
    target_url TEXT NOT NULL,
    link_type TEXT NOT NULL,
    status_code INTEGER,
    response_time REAL,
    severity TEXT NOT NULL,
    error_message TEXT,
    checked_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawl_id ON link_results(crawl_id);
CREATE INDEX IF NOT EXISTS idx_severity ON link_results(severity);
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
