//! Fixed-size worker pool
//!
//! Each phase spawns exactly `size` worker tasks that drain a shared bounded
//! queue. A worker runs one job at a time in its own task and sends the
//! result back as soon as it completes. The feeder blocks once the queue is
//! full, so a long date range never runs more than `size` jobs or buffers
//! more than `size` items. [`WorkerPool::run_phase`] returns only after every
//! worker has finished.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Runs batches of independent jobs with at most `size` in flight
#[derive(Debug)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Creates a pool of `size` workers; a size of zero is raised to one
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        tracing::debug!(workers = size, "Starting worker pool");
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `job` on every item and waits for all of them
    ///
    /// Results come back in completion order. Each job runs in its own task,
    /// so a job that panics is logged and contributes no result while its
    /// worker moves on to the next item.
    pub async fn run_phase<I, T, F, Fut>(&self, phase: &'static str, items: I, job: F) -> Vec<T>
    where
        I: IntoIterator,
        I::Item: Send + 'static,
        F: Fn(I::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<I::Item>(self.size);
        let (result_sender, mut result_receiver) = mpsc::unbounded_channel::<T>();
        let receiver = Arc::new(Mutex::new(receiver));
        let job = Arc::new(job);

        let mut workers = JoinSet::new();
        for worker in 0..self.size {
            let receiver = Arc::clone(&receiver);
            let job = Arc::clone(&job);
            let results = result_sender.clone();

            workers.spawn(async move {
                loop {
                    // Release the lock before running the job so other workers can pick up items
                    let next = receiver.lock().await.recv().await;
                    let Some(item) = next else {
                        tracing::trace!(phase, worker, "Queue drained, worker stopping");
                        break;
                    };

                    match tokio::spawn(job(item)).await {
                        Ok(result) => {
                            // The receiving end lives until every worker has stopped
                            let _ = results.send(result);
                        }
                        Err(e) => tracing::error!(phase, worker, "Job failed: {}", e),
                    }
                }
            });
        }
        // Only workers hold the queue and result ends from here on
        drop(receiver);
        drop(result_sender);

        let mut submitted = 0usize;
        for item in items {
            if sender.send(item).await.is_err() {
                tracing::error!(phase, "All workers stopped, remaining items were not submitted");
                break;
            }
            submitted += 1;
        }
        // Closing the queue lets idle workers exit
        drop(sender);
        tracing::debug!(phase, submitted, "All items submitted, waiting for workers");

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(phase, "Worker task failed: {}", e);
            }
        }

        let mut results = Vec::with_capacity(submitted);
        while let Some(result) = result_receiver.recv().await {
            results.push(result);
        }
        results
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        tracing::debug!(workers = self.size, "Shutting down worker pool");
    }
}
