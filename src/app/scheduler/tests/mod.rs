//! Tests for batch partitioning and the per-batch barrier

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};

use super::*;
use crate::app::coordinator::stats::RunStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Started(usize),
    Finished(usize),
}

/// Run `count` items that sleep for a random short time, logging start and finish
async fn run_logged(batch_size: usize, count: usize) -> (BatchSummary, Vec<Event>) {
    let scheduler = BatchScheduler::new(batch_size).unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));

    let log = events.clone();
    let summary = scheduler
        .run((0..count).collect(), move |id: usize| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(Event::Started(id));
                sleep(Duration::from_millis(fastrand::u64(1..15))).await;
                log.lock().unwrap().push(Event::Finished(id));
            }
        })
        .await;

    let events = events.lock().unwrap().clone();
    (summary, events)
}

#[test]
fn test_zero_batch_size_rejected() {
    assert!(matches!(
        BatchScheduler::new(0),
        Err(SchedulerError::ZeroBatchSize)
    ));
}

#[test]
fn test_partition_sizes() {
    for batch_size in 1..=7 {
        let scheduler = BatchScheduler::new(batch_size).unwrap();
        for count in 0..=30 {
            let items: Vec<usize> = (0..count).collect();
            let batches = scheduler.partition(items.clone());

            assert_eq!(batches.len(), count.div_ceil(batch_size));
            assert_eq!(batches.len(), scheduler.batch_count(count));

            if let Some((last, full)) = batches.split_last() {
                assert!(full.iter().all(|batch| batch.len() == batch_size));
                let expected_last = match count % batch_size {
                    0 => batch_size,
                    rest => rest,
                };
                assert_eq!(last.len(), expected_last);
            }

            let flattened: Vec<usize> = batches.into_iter().flatten().collect();
            assert_eq!(flattened, items, "order kept for N={count} T={batch_size}");
        }
    }
}

#[test]
fn test_default_batch_size() {
    assert_eq!(
        BatchScheduler::default().batch_size(),
        crate::constants::DEFAULT_BATCH_SIZE
    );
}

#[tokio::test]
async fn test_empty_run() {
    let (summary, events) = run_logged(4, 0).await;
    assert_eq!(summary, BatchSummary::default());
    assert!(events.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_item_runs_once() {
    let (summary, events) = run_logged(3, 10).await;

    assert_eq!(summary.batches, 4);
    assert_eq!(summary.dispatched, 10);
    assert_eq!(summary.panicked, 0);

    let mut started: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            Event::Started(id) => Some(*id),
            Event::Finished(_) => None,
        })
        .collect();
    started.sort_unstable();
    assert_eq!(started, (0..10).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_barrier() {
    let batch_size = 3;
    let (_, events) = run_logged(batch_size, 11).await;

    let position = |wanted: Event| events.iter().position(|event| *event == wanted).unwrap();

    for id in batch_size..11 {
        let batch = id / batch_size;
        let started_at = position(Event::Started(id));
        for previous in (batch - 1) * batch_size..batch * batch_size {
            assert!(
                position(Event::Finished(previous)) < started_at,
                "item {id} started before item {previous} of the previous batch finished"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_never_exceeds_batch_size() {
    let batch_size = 4;
    let scheduler = BatchScheduler::new(batch_size).unwrap();
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let (current, max) = (in_flight.clone(), peak.clone());
    scheduler
        .run((0..25).collect(), move |_: usize| {
            let (current, max) = (current.clone(), max.clone());
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

    assert!(peak.load(Ordering::SeqCst) <= batch_size);
    assert!(peak.load(Ordering::SeqCst) >= 2);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

/// Hard batching: a slow first item holds back the second batch even though
/// its sibling finished long before. A sliding-window pool would not.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_item_stalls_next_batch() {
    let scheduler = BatchScheduler::new(2).unwrap();
    let origin = Instant::now();
    let slow_done = Arc::new(Mutex::new(None));
    let third_started = Arc::new(Mutex::new(None));

    let (done, started) = (slow_done.clone(), third_started.clone());
    scheduler
        .run(vec![0usize, 1, 2], move |id| {
            let (done, started) = (done.clone(), started.clone());
            async move {
                match id {
                    0 => {
                        sleep(Duration::from_millis(150)).await;
                        *done.lock().unwrap() = Some(origin.elapsed());
                    }
                    1 => sleep(Duration::from_millis(5)).await,
                    _ => *started.lock().unwrap() = Some(origin.elapsed()),
                }
            }
        })
        .await;

    let slow_done = slow_done.lock().unwrap().unwrap();
    let third_started = third_started.lock().unwrap().unwrap();
    assert!(third_started >= slow_done);
    assert!(third_started >= Duration::from_millis(150));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panicking_handler_does_not_stop_others() {
    let scheduler = BatchScheduler::new(3).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));

    let counter = completed.clone();
    let summary = scheduler
        .run((0..9).collect(), move |id: usize| {
            let counter = counter.clone();
            async move {
                if id == 4 {
                    panic!("handler failure for item {id}");
                }
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await;

    assert_eq!(summary.batches, 3);
    assert_eq!(summary.dispatched, 9);
    assert_eq!(summary.panicked, 1);
    assert_eq!(completed.load(Ordering::SeqCst), 8);
}

/// Full parallelism over many items must not lose counter updates
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_full_parallelism_counts_every_item() {
    let count = 64;
    let scheduler = BatchScheduler::new(count).unwrap();
    let stats = Arc::new(RunStatistics::new());

    let shared = stats.clone();
    let summary = scheduler
        .run((0..count).collect(), move |id: usize| {
            let stats = shared.clone();
            async move {
                tokio::task::yield_now().await;
                if id % 5 == 0 {
                    stats.record_failure();
                } else {
                    stats.record_processed();
                }
            }
        })
        .await;

    let report = stats.report();
    assert_eq!(summary.batches, 1);
    assert_eq!(report.total_finished(), count);
    assert_eq!(report.failed, (0..count).filter(|id| id % 5 == 0).count());
}
