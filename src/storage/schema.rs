//! Database schema definitions
//!
//! This module contains the SQL schema for the Sitewalk crawl database.

/// SQL schema for the database
///
/// `links` and `errors` hold JSON arrays. `created_at` is RFC 3339 in UTC
/// with a fixed fractional width so text order matches time order.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS crawls (
    id TEXT PRIMARY KEY NOT NULL,
    initial_url TEXT NOT NULL,
    host TEXT NOT NULL,
    links TEXT NOT NULL,
    errors TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawls_host ON crawls(host);
CREATE INDEX IF NOT EXISTS idx_crawls_created ON crawls(created_at);
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
