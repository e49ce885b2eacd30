//! Concurrency governor
//!
//! A counting gate sized to the worker budget. It bounds how many fetches
//! are in flight at once, not how many URLs a crawl may process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded admission gate for fetch tasks
#[derive(Debug, Clone)]
pub struct Governor {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    peak: Arc<AtomicUsize>,
}

/// A held worker slot, freed when dropped
///
/// Dropping is the only way to release, so the slot comes back on every
/// exit path of the task that holds it, panics included.
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
}

impl Governor {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits for a free slot
    ///
    /// Returns `None` only if the governor has been closed.
    pub async fn acquire(&self) -> Option<WorkerSlot> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        self.peak.fetch_max(self.in_use(), Ordering::Relaxed);
        Some(WorkerSlot { _permit: permit })
    }

    /// Stops handing out slots; pending and future `acquire` calls get `None`
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Highest number of slots ever held at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}
