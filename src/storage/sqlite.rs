//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CrawlStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CrawlStore, StorageError, StorageResult};
use crate::storage::CrawlRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, initial_url, host, links, errors, created_at FROM crawls";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a crawl database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_records(&self, sql: &str, host: Option<&str>) -> StorageResult<Vec<CrawlRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match host {
            Some(host) => stmt
                .query_map(params![host], RawRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], RawRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        rows.into_iter().map(RawRow::into_record).collect()
    }
}

/// Column values as read, before JSON and timestamp decoding
struct RawRow {
    id: String,
    initial_url: String,
    host: String,
    links: String,
    errors: String,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            initial_url: row.get(1)?,
            host: row.get(2)?,
            links: row.get(3)?,
            errors: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_record(self) -> StorageResult<CrawlRecord> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StorageError::Serialization(format!("created_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(CrawlRecord {
            id: self.id,
            initial_url: self.initial_url,
            host: self.host,
            links: serde_json::from_str(&self.links)?,
            errors: serde_json::from_str(&self.errors)?,
            created_at,
        })
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl CrawlStore for SqliteStore {
    fn save(&mut self, record: &mut CrawlRecord) -> StorageResult<()> {
        let links = serde_json::to_string(&record.links)?;
        let errors = serde_json::to_string(&record.errors)?;
        let mut stamped = record.clone();
        stamped.stamp();
        let created_at = stamped
            .created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true);

        let inserted = self.conn.execute(
            "INSERT INTO crawls (id, initial_url, host, links, errors, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                stamped.id,
                stamped.initial_url,
                stamped.host,
                links,
                errors,
                created_at
            ],
        );

        match inserted {
            Ok(_) => {
                record.created_at = stamped.created_at;
                Ok(())
            }
            Err(e) if is_constraint_violation(&e) => Err(StorageError::Duplicate(record.id.clone())),
            Err(e) => Err(e.into()),
        }
    }

    fn get_by_id(&self, id: &str) -> StorageResult<CrawlRecord> {
        let raw = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                RawRow::from_row,
            )
            .optional()?;

        match raw {
            Some(raw) => raw.into_record(),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }

    fn history(&self) -> StorageResult<Vec<CrawlRecord>> {
        self.query_records(SELECT_COLUMNS, None)
    }

    fn by_host(&self, host: &str) -> StorageResult<Vec<CrawlRecord>> {
        self.query_records(
            &format!("{} WHERE host = ?1 ORDER BY created_at ASC", SELECT_COLUMNS),
            Some(host),
        )
    }
}
