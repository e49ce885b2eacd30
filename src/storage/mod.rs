//! Storage module for persisting completed crawls
//!
//! This module handles keeping crawl results around between requests:
//! - The [`CrawlRecord`] shape a finished crawl is stored as
//! - An in-memory store for library use and tests
//! - A SQLite store so results survive across CLI invocations

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CrawlStore, StorageError, StorageResult};

use crate::crawler::CrawlReport;
use crate::CrawlError;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed crawl as it is persisted and reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRecord {
    pub id: String,
    pub initial_url: String,
    pub host: String,
    pub links: Vec<String>,
    pub errors: Vec<CrawlError>,
    pub created_at: DateTime<Utc>,
}

impl CrawlRecord {
    /// Wraps a crawl report under a fresh random id
    pub fn new(initial_url: impl Into<String>, host: impl Into<String>, report: CrawlReport) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            initial_url: initial_url.into(),
            host: host.into(),
            links: report.links,
            errors: report.errors,
            created_at: now(),
        }
    }

    /// True if the record was created within `window` before `at`
    ///
    /// Records stamped in the future are not fresh.
    pub fn is_fresh(&self, window: Duration, at: DateTime<Utc>) -> bool {
        self.created_at >= at - window && self.created_at <= at
    }

    pub(crate) fn stamp(&mut self) {
        self.created_at = now();
    }
}

/// Current time at the precision the SQLite store keeps
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(created_at: DateTime<Utc>) -> CrawlRecord {
        CrawlRecord {
            created_at,
            ..CrawlRecord::new("https://example.test/", "example.test", CrawlReport::default())
        }
    }

    #[test]
    fn test_new_record_has_uuid() {
        let record = CrawlRecord::new("https://example.test/", "example.test", CrawlReport::default());
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = CrawlRecord::new("https://example.test/", "example.test", CrawlReport::default());
        let b = CrawlRecord::new("https://example.test/", "example.test", CrawlReport::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_freshness_window() {
        let at = Utc::now();
        let window = Duration::hours(24);

        assert!(record_at(at).is_fresh(window, at));
        assert!(record_at(at - Duration::hours(23)).is_fresh(window, at));
        assert!(record_at(at - window).is_fresh(window, at));
        assert!(!record_at(at - Duration::hours(25)).is_fresh(window, at));
        assert!(!record_at(at + Duration::minutes(1)).is_fresh(window, at));
    }

    #[test]
    fn test_record_serializes_errors_with_kind() {
        let mut record = record_at(Utc::now());
        record.errors.push(CrawlError::fetch("https://example.test/x", "HTTP 500"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["errors"][0]["kind"], "fetch");
        assert_eq!(json["errors"][0]["url"], "https://example.test/x");
    }
}
