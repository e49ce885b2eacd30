//! Frontier, dedup store and error collector
//!
//! The only shared mutable sets of a crawl. Both are safe to use from any
//! number of tasks at once without outside locking.

use crate::CrawlError;
use dashmap::DashSet;
use std::sync::{Mutex, PoisonError};

/// Set of absolute URLs admitted for processing during one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    seen: DashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` as seen, returning true only for its first admission
    ///
    /// The membership check and the insert happen as one operation on the
    /// shard that owns the key. Splitting them into a `contains` followed by
    /// an `insert` lets two tasks both see the URL as new and fetch it twice.
    pub fn try_admit(&self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Every admitted URL, in no particular order
    ///
    /// Only meaningful once the crawl has settled.
    pub fn snapshot(&self) -> Vec<String> {
        self.seen.iter().map(|url| url.key().clone()).collect()
    }
}

/// Concurrent collection of per-link failures
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Mutex<Vec<CrawlError>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error; duplicates are kept
    pub fn record(&self, error: CrawlError) {
        tracing::warn!("{}", error);
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    pub fn len(&self) -> usize {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<CrawlError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
