//! Bulk archive retrieval with a bounded worker pool
//!
//! Workers share one bounded job queue. A failed item goes back onto the
//! same queue with one retry fewer until it runs out, at which point it is
//! reported on the results channel. Completion is tracked by a pending
//! counter rather than by queue emptiness, since an item may be in flight or
//! about to be requeued while the queue looks empty. The queue is closed
//! only once that counter reaches zero.
//!
//! A single consumer drains the results channel. Any permanent failure
//! poisons the whole cache: a half-finished bulk run cannot be told apart
//! from a complete one later.

use crate::cache::CacheStore;
use crate::catalog::{Sample, Samples};
use crate::error::{MirrorError, MirrorResult};
use crate::sync::lazy::LazyFetcher;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info};

/// Number of concurrent workers
pub const DEFAULT_WORKERS: usize = 5;

/// Attempts per sample before it counts as a permanent failure
pub const DEFAULT_RETRIES: u32 = 3;

/// Capacity of the job queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

const RESULTS_CAPACITY: usize = 100;

/// One sample to retrieve
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub language: String,
    pub sample: Sample,
    /// Attempts left, decremented on every failure
    pub retries_remaining: u32,
}

/// A sample that exhausted its retries
#[derive(Debug)]
pub struct RetrievalFailure {
    pub language: String,
    pub path: String,
    pub error: MirrorError,
}

/// Summary of a fully successful bulk run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkReport {
    /// Samples resolved
    pub total: usize,
    /// Retrieval attempts made, retries included
    pub attempts: usize,
}

/// Counts samples that are neither fetched nor permanently failed
struct Pending {
    remaining: AtomicUsize,
    done: Notify,
}

impl Pending {
    fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            done: Notify::new(),
        }
    }

    fn resolve(&self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.done.notify_one();
        }
    }

    async fn wait(&self) {
        while self.remaining.load(Ordering::Acquire) > 0 {
            self.done.notified().await;
        }
    }
}

/// Drives a bulk retrieval pass
#[derive(Debug, Clone)]
pub struct RetrievalScheduler {
    workers: usize,
    retries: u32,
    queue_capacity: usize,
}

impl Default for RetrievalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS, DEFAULT_RETRIES, DEFAULT_QUEUE_CAPACITY)
    }
}

impl RetrievalScheduler {
    pub fn new(workers: usize, retries: u32, queue_capacity: usize) -> Self {
        Self {
            workers: workers.max(1),
            retries: retries.max(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// One work item per distinct `(language, path)`
    pub fn work_items(&self, samples: &Samples) -> Vec<WorkItem> {
        let mut seen = HashSet::new();
        samples
            .iter()
            .flat_map(|(language, list)| list.iter().map(move |s| (language, s)))
            .filter(|(language, s)| seen.insert((language.as_str(), s.path.as_str())))
            .map(|(language, sample)| WorkItem {
                language: language.clone(),
                sample: sample.clone(),
                retries_remaining: self.retries,
            })
            .collect()
    }

    /// Retrieve every item, poisoning `store` if any item fails for good
    pub async fn run(
        &self,
        fetcher: &LazyFetcher,
        store: &CacheStore,
        items: Vec<WorkItem>,
    ) -> MirrorResult<BulkReport> {
        let total = items.len();
        if total == 0 {
            return Ok(BulkReport {
                total: 0,
                attempts: 0,
            });
        }
        info!(
            "Retrieving {} sample archive(s) with {} worker(s)",
            total, self.workers
        );

        let (jobs_tx, jobs_rx) = async_channel::bounded::<WorkItem>(self.queue_capacity);
        let (results_tx, results_rx) = mpsc::channel::<RetrievalFailure>(RESULTS_CAPACITY);
        let pending = Arc::new(Pending::new(total));
        let attempts = Arc::new(AtomicUsize::new(0));

        let aggregator = tokio::spawn(aggregate_failures(results_rx, store.clone()));

        let workers: Vec<_> = (0..self.workers)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    jobs_rx.clone(),
                    jobs_tx.clone(),
                    results_tx.clone(),
                    fetcher.clone(),
                    pending.clone(),
                    attempts.clone(),
                ))
            })
            .collect();
        drop(jobs_rx);
        drop(results_tx);

        for item in items {
            // Blocks while the queue is full
            if jobs_tx.send(item).await.is_err() {
                return Err(MirrorError::Internal("job queue closed early".to_string()));
            }
        }

        pending.wait().await;
        jobs_tx.close();

        for handle in workers {
            handle
                .await
                .map_err(|e| MirrorError::Internal(format!("retrieval worker panicked: {}", e)))?;
        }
        let failed = aggregator
            .await
            .map_err(|e| MirrorError::Internal(format!("failure aggregator panicked: {}", e)))??;

        if failed > 0 {
            return Err(MirrorError::BulkRetrieval { failed, total });
        }

        let attempts = attempts.load(Ordering::Relaxed);
        info!("Retrieved {} sample archive(s) in {} attempt(s)", total, attempts);
        Ok(BulkReport { total, attempts })
    }
}

async fn worker(
    id: usize,
    jobs: async_channel::Receiver<WorkItem>,
    requeue: async_channel::Sender<WorkItem>,
    results: mpsc::Sender<RetrievalFailure>,
    fetcher: LazyFetcher,
    pending: Arc<Pending>,
    attempts: Arc<AtomicUsize>,
) {
    while let Ok(mut item) = jobs.recv().await {
        loop {
            attempts.fetch_add(1, Ordering::Relaxed);
            let error = match fetcher.fetch(&item.language, &item.sample.path).await {
                Ok(_) => {
                    pending.resolve();
                    break;
                }
                Err(e) => e,
            };

            item.retries_remaining = item.retries_remaining.saturating_sub(1);
            if item.retries_remaining == 0 || !error.is_retryable() {
                let failure = RetrievalFailure {
                    language: item.language,
                    path: item.sample.path,
                    error,
                };
                // The aggregator outlives every worker
                let _ = results.send(failure).await;
                pending.resolve();
                break;
            }

            debug!(
                "worker {}: '{}' failed, {} attempt(s) left: {}",
                id, item.sample.path, item.retries_remaining, error
            );
            // A full queue must not block a worker, or every worker could end
            // up waiting on the queue it is supposed to drain.
            match requeue.try_send(item) {
                Ok(()) => break,
                Err(e) => item = e.into_inner(),
            }
        }
    }
}

async fn aggregate_failures(
    mut results: mpsc::Receiver<RetrievalFailure>,
    store: CacheStore,
) -> MirrorResult<usize> {
    let mut failed = 0;
    while let Some(failure) = results.recv().await {
        error!(
            "Failed to retrieve {} sample '{}': {}",
            failure.language, failure.path, failure.error
        );
        failed += 1;
    }

    if failed > 0 {
        store.lock()?;
    }
    Ok(failed)
}
