//! Concurrent paginated-batch-fetch utility.
//!
//! This module provides [`BatchProcessor`], which drives paginated retrieval
//! of a remote collection and streams each page to a caller-supplied
//! processing function, bounding how many page fetches run concurrently.
//! Every service client that exposes a `get_*_in_batches` /
//! `*_batch_process` operation is built on this single routine.
//!
//! # Concurrency Model
//!
//! - The first page (offset 0) is always fetched and processed sequentially
//!   on the caller's task; its response is the only source of the
//!   collection's total count.
//! - Each remaining page is fetched in its own Tokio task; a semaphore
//!   permit is acquired before spawning and released by RAII drop, so at
//!   most `max_workers` fetches are in flight at any time.
//! - Processing callbacks are serialized behind a lock: no two invocations
//!   of the processing function ever overlap, so a caller's accumulator
//!   needs no internal synchronization.
//! - The first error from a fetch or from processing wins; it raises a
//!   one-way abort latch that unstarted workers observe before fetching.
//!   Already-dispatched fetches are not cancelled, they complete and no-op.
//!
//! # Ordering
//!
//! Processing is serialized but NOT ordered by offset: workers race for the
//! lock as their fetches complete, so with `max_workers > 1` page 3 may be
//! processed before page 2. Callers that need offset order must sort their
//! accumulator themselves.
//!
//! # Example
//!
//! ```no_run
//! use publishing_clients::batch::{BatchProcessor, BatchStep};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = BatchProcessor::new(100, 5)?;
//! let mut seen = 0usize;
//! processor
//!     .run(
//!         |offset| async move {
//!             // one page fetch; returns (page items, total collection count)
//!             Ok::<_, std::io::Error>((vec![offset], 1000))
//!         },
//!         move |page: Vec<usize>| {
//!             seen += page.len();
//!             Ok(BatchStep::Continue)
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, Semaphore, mpsc, oneshot};
use tracing::{debug, instrument};

/// Error type for batch processor configuration.
#[derive(Debug, thiserror::Error)]
pub enum BatchConfigError {
    /// Batch size must be positive; the page arithmetic divides by it.
    #[error("invalid batch size {value}: must be greater than zero")]
    InvalidBatchSize {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Worker bound must be positive or no page could ever be fetched.
    #[error("invalid max workers {value}: must be greater than zero")]
    InvalidMaxWorkers {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Verdict returned by a page-processing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStep {
    /// Keep fetching and processing the remaining pages.
    Continue,
    /// Stop early without an error; the caller has what it needs.
    Abort,
}

/// One-shot, idempotent "stop now" signal shared across workers.
///
/// Once signalled it is never un-set. Raising it again is a no-op.
#[derive(Debug, Clone, Default)]
struct AbortLatch(Arc<AtomicBool>);

impl AbortLatch {
    fn signal(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_signalled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives paginated retrieval with bounded concurrency and serialized
/// processing callbacks.
///
/// Construction validates the configuration; [`run`](Self::run) executes one
/// retrieval. All coordination state (semaphore, abort latch, error channel)
/// is created fresh per invocation, so a processor value may be reused for
/// independent runs.
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor {
    batch_size: usize,
    max_workers: usize,
}

impl BatchProcessor {
    /// Creates a batch processor.
    ///
    /// # Errors
    ///
    /// Returns [`BatchConfigError`] when `batch_size` or `max_workers` is
    /// zero.
    pub fn new(batch_size: usize, max_workers: usize) -> Result<Self, BatchConfigError> {
        if batch_size == 0 {
            return Err(BatchConfigError::InvalidBatchSize { value: batch_size });
        }
        if max_workers == 0 {
            return Err(BatchConfigError::InvalidMaxWorkers { value: max_workers });
        }
        Ok(Self {
            batch_size,
            max_workers,
        })
    }

    /// Returns the configured page size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the configured worker bound.
    #[must_use]
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Fetches every page of a collection, handing each page to
    /// `process_page`.
    ///
    /// `fetch_page` receives a zero-based item offset and returns the page
    /// at that offset together with the collection's total item count; only
    /// the count from offset 0 is read. It may be invoked concurrently by up
    /// to `max_workers` workers. `process_page` invocations never overlap,
    /// but arrive in fetch-completion order, not offset order.
    ///
    /// Returns `Ok(())` on full completion and on processor-requested abort.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by either `fetch_page` or
    /// `process_page`. Later errors from pages already in flight are
    /// discarded.
    #[instrument(
        level = "debug",
        skip(self, fetch_page, process_page),
        fields(batch_size = self.batch_size, max_workers = self.max_workers)
    )]
    pub async fn run<B, E, F, Fut, P>(&self, fetch_page: F, mut process_page: P) -> Result<(), E>
    where
        B: Send + 'static,
        E: Send + 'static,
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(B, usize), E>> + Send + 'static,
        P: FnMut(B) -> Result<BatchStep, E> + Send + 'static,
    {
        // Bootstrap: the first page runs sequentially and is the only read
        // of the collection's total count. A collection that changes size
        // mid-run yields undefined completeness.
        let (first_batch, total_count) = fetch_page(0).await?;
        match process_page(first_batch)? {
            BatchStep::Abort => return Ok(()),
            BatchStep::Continue => {}
        }

        let remaining = remaining_pages(total_count, self.batch_size);
        debug!(total_count, remaining, "first batch processed");
        if remaining == 0 {
            return Ok(());
        }

        let fetch_page = Arc::new(fetch_page);
        let process_page = Arc::new(Mutex::new(process_page));
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let abort = AbortLatch::default();
        // Capacity of one: the first error wins, the rest are dropped.
        let (err_tx, mut err_rx) = mpsc::channel::<E>(1);

        let mut handles = Vec::with_capacity(remaining);
        for page in 1..=remaining {
            let offset = page * self.batch_size;
            // The semaphore is created above and never closed, so
            // acquisition can only fail if the runtime is tearing down.
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            let fetch_page = Arc::clone(&fetch_page);
            let process_page = Arc::clone(&process_page);
            let abort = abort.clone();
            let err_tx = err_tx.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this task exits (RAII).
                let _permit = permit;

                // Best-effort early exit; a fetch already in flight when the
                // latch is raised is allowed to complete.
                if abort.is_signalled() {
                    debug!(offset, "abort signalled, skipping batch");
                    return;
                }

                let batch = match (*fetch_page)(offset).await {
                    Ok((batch, _)) => batch,
                    Err(e) => {
                        abort.signal();
                        let _ = err_tx.try_send(e);
                        return;
                    }
                };

                // The serializing lock: processing callbacks never overlap.
                let mut process_page = process_page.lock().await;
                match (*process_page)(batch) {
                    Ok(BatchStep::Continue) => {}
                    Ok(BatchStep::Abort) => abort.signal(),
                    Err(e) => {
                        abort.signal();
                        let _ = err_tx.try_send(e);
                    }
                }
            }));
        }
        drop(err_tx);

        // Supervisor: close the completion signal once every worker is done.
        let (done_tx, done_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            for handle in handles {
                let _ = handle.await;
            }
            let _ = done_tx.send(());
        });

        // Return the first error as soon as it surfaces; workers already in
        // flight complete detached and no-op. On completion, drain the error
        // channel once more in case a worker errored in the same instant.
        tokio::select! {
            Some(e) = err_rx.recv() => Err(e),
            _ = done_rx => match err_rx.try_recv() {
                Ok(e) => Err(e),
                Err(_) => Ok(()),
            },
        }
    }
}

/// Number of pages beyond the first, given the total count discovered by the
/// bootstrap fetch.
///
/// The quotient counts all full pages; when the total is an exact multiple
/// of the batch size the first page already consumed one unit of it.
fn remaining_pages(total_count: usize, batch_size: usize) -> usize {
    let pages = total_count / batch_size;
    if total_count % batch_size == 0 {
        pages.saturating_sub(1)
    } else {
        pages
    }
}
