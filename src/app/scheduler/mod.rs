//! Fixed-size batch scheduling
//!
//! Items are split into consecutive batches of `batch_size`. Every item of a
//! batch runs as its own tokio task; the scheduler waits for the whole batch
//! before spawning the next one. This is hard batching, not a sliding
//! window: one slow item holds back the start of the following batch.
//!
//! Handlers return `()`. Each handler records its own outcome, so nothing a
//! handler does can stop its siblings or later batches. A panicking handler
//! is logged and counted in the [`BatchSummary`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use podcast_fetcher::app::BatchScheduler;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = BatchScheduler::new(4)?;
//! let summary = scheduler
//!     .run((0..10).collect(), |n: u32| async move {
//!         println!("item {}", n);
//!     })
//!     .await;
//! assert_eq!(summary.batches, 3);
//! # Ok(())
//! # }
//! ```

#[cfg(test)]
pub mod tests;

use std::future::Future;
use std::num::NonZeroUsize;

use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::errors::SchedulerError;

/// What happened during a scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Batches started (and waited on)
    pub batches: usize,
    /// Handler tasks spawned
    pub dispatched: usize,
    /// Handler tasks that panicked or were cancelled
    pub panicked: usize,
}

/// Runs handlers over items in fixed-size concurrent batches
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    batch_size: NonZeroUsize,
}

impl BatchScheduler {
    /// Create a scheduler that runs at most `batch_size` handlers at once
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::ZeroBatchSize` if `batch_size` is zero
    pub fn new(batch_size: usize) -> Result<Self, SchedulerError> {
        NonZeroUsize::new(batch_size)
            .map(|batch_size| Self { batch_size })
            .ok_or(SchedulerError::ZeroBatchSize)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Number of batches needed for `item_count` items
    pub fn batch_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.batch_size.get())
    }

    /// Split items into ordered batches; only the last one may be short
    pub fn partition<T>(&self, items: Vec<T>) -> Vec<Vec<T>> {
        let size = self.batch_size.get();
        let mut batches = Vec::with_capacity(self.batch_count(items.len()));
        let mut items = items.into_iter().peekable();

        while items.peek().is_some() {
            batches.push(items.by_ref().take(size).collect());
        }

        batches
    }

    /// Run `handler` for every item, one batch at a time
    ///
    /// Returns once every batch has been waited on.
    pub async fn run<T, F, Fut>(&self, items: Vec<T>, handler: F) -> BatchSummary
    where
        T: Send + 'static,
        F: Fn(T) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let batches = self.partition(items);
        let total = batches.len();
        let mut summary = BatchSummary::default();

        for (index, batch) in batches.into_iter().enumerate() {
            debug!(
                "Starting batch {}/{} with {} items",
                index + 1,
                total,
                batch.len()
            );

            let mut tasks = JoinSet::new();
            for item in batch {
                tasks.spawn(handler(item));
                summary.dispatched += 1;
            }

            // Barrier: the next batch starts only after every task here finished
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    error!("Task in batch {} terminated abnormally: {}", index + 1, e);
                    summary.panicked += 1;
                }
            }

            summary.batches += 1;
            debug!("Finished batch {}/{}", index + 1, total);
        }

        summary
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(crate::constants::DEFAULT_BATCH_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}
