//! Run statistics tracking and reporting
//!
//! Counters are shared by every concurrent task of a run, so they are plain
//! atomics behind an `Arc`. The report is a snapshot taken once processing
//! has finished.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters shared across all tasks of a run
#[derive(Debug, Default)]
pub struct RunStatistics {
    downloaded: AtomicUsize,
    processed: AtomicUsize,
    failed: AtomicUsize,
    elapsed_nanos: AtomicU64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A media transfer completed
    pub fn record_download(&self) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
    }

    /// An item reached its successful terminal state
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// An item failed to download or tag
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Store the wall-clock duration of the run
    pub fn set_elapsed(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.store(nanos, Ordering::Relaxed);
    }

    /// Snapshot the counters
    pub fn report(&self) -> RunReport {
        RunReport {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            elapsed: Duration::from_nanos(self.elapsed_nanos.load(Ordering::Relaxed)),
        }
    }
}

/// Final statistics of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Files fetched over the network
    pub downloaded: usize,
    /// Items that ended tagged (plus the cover task)
    pub processed: usize,
    /// Items that failed to download or tag
    pub failed: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Items that reached a terminal state
    pub fn total_finished(&self) -> usize {
        self.processed + self.failed
    }

    /// Render the report as human-readable lines
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("* {} files were downloaded", self.downloaded),
            format!("* {} files were processed", self.processed),
            format!("* {} files were failed", self.failed),
            format!("* {:?} spent", self.elapsed),
        ]
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
