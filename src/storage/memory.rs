//! In-memory crawl record store

use crate::storage::traits::{CrawlStore, StorageError, StorageResult};
use crate::storage::CrawlRecord;
use std::collections::HashMap;

/// Crawl records kept in a map for the life of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, CrawlRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with records, timestamps untouched
    pub fn with_records(records: impl IntoIterator<Item = CrawlRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CrawlStore for MemoryStore {
    fn save(&mut self, record: &mut CrawlRecord) -> StorageResult<()> {
        if self.records.contains_key(&record.id) {
            return Err(StorageError::Duplicate(record.id.clone()));
        }
        record.stamp();
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> StorageResult<CrawlRecord> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn history(&self) -> StorageResult<Vec<CrawlRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn by_host(&self, host: &str) -> StorageResult<Vec<CrawlRecord>> {
        let mut records: Vec<CrawlRecord> = self
            .records
            .values()
            .filter(|record| record.host == host)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}
