//! Completion tracking for a crawl over a graph discovered on the fly
//!
//! The number of pages is unknown up front, so completion cannot be detected
//! by counting a fixed task list. Instead the tracker keeps a live balance of
//! work promised against work finished:
//!
//! - [`CompletionTracker::admit`] is called once per admitted URL, strictly
//!   before that URL is put on the work queue;
//! - [`CompletionTracker::finish`] is called once per URL, strictly after its
//!   task (including any admissions it made) has completed.
//!
//! Since a task's own admissions happen while its own unit is still counted,
//! the balance can only reach zero once no task is left that could admit
//! anything, and that zero-crossing flips the tracker to [`CrawlState::Done`].

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Lifecycle of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// Admitted URLs are waiting on the work queue
    Running,
    /// Everything admitted has been dispatched; only in-flight tasks remain
    Draining,
    /// The outstanding balance reached zero
    Done,
}

/// Live balance of admitted-but-unfinished crawl tasks
#[derive(Debug)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    queued: AtomicUsize,
    done: watch::Sender<bool>,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTracker {
    pub fn new() -> Self {
        let (done, _) = watch::channel(false);
        Self {
            outstanding: AtomicUsize::new(0),
            queued: AtomicUsize::new(0),
            done,
        }
    }

    /// Accounts for a newly admitted URL about to be queued
    pub fn admit(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.queued.fetch_add(1, Ordering::SeqCst);
    }

    /// Notes that a queued URL has been handed to a task
    pub fn dispatched(&self) {
        let _ = self
            .queued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Accounts for a task that has fully finished
    ///
    /// Returns true for the call that brought the balance to zero. The
    /// balance never goes below zero; an unmatched call is logged and ignored.
    pub fn finish(&self) -> bool {
        match self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        {
            Ok(1) => {
                self.done.send_replace(true);
                true
            }
            Ok(_) => false,
            Err(_) => {
                tracing::error!("Task finished with no outstanding work recorded");
                false
            }
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn is_done(&self) -> bool {
        *self.done.borrow()
    }

    pub fn state(&self) -> CrawlState {
        if self.is_done() {
            CrawlState::Done
        } else if self.queued.load(Ordering::SeqCst) == 0 {
            CrawlState::Draining
        } else {
            CrawlState::Running
        }
    }

    /// Resolves once the balance has reached zero
    pub async fn wait(&self) {
        let mut done = self.done.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = done.wait_for(|done| *done).await;
    }
}

/// Calls [`CompletionTracker::finish`] when dropped
///
/// Held for the whole body of a crawl task so the balance is settled on every
/// exit path, including a panic inside the task.
pub(crate) struct FinishGuard<'a> {
    tracker: &'a CompletionTracker,
}

impl<'a> FinishGuard<'a> {
    pub(crate) fn new(tracker: &'a CompletionTracker) -> Self {
        Self { tracker }
    }
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}
