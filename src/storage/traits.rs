//! Storage traits and error types
//!
//! This module defines the trait interface for crawl record stores and
//! associated error types.

use crate::storage::CrawlRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Duplicated key not allowed: {0}")]
    Duplicate(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl record stores
///
/// Records are written once and never updated.
pub trait CrawlStore {
    /// Persists a completed crawl
    ///
    /// Stamps `created_at` with the current time before writing.
    ///
    /// # Errors
    ///
    /// * `StorageError::Duplicate` - A record with the same id already exists
    fn save(&mut self, record: &mut CrawlRecord) -> StorageResult<()>;

    /// Gets a record by id
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - No record has this id
    fn get_by_id(&self, id: &str) -> StorageResult<CrawlRecord>;

    /// Gets every stored record, in no particular order
    fn history(&self) -> StorageResult<Vec<CrawlRecord>>;

    /// Gets all records for a host, oldest first
    fn by_host(&self, host: &str) -> StorageResult<Vec<CrawlRecord>>;
}
