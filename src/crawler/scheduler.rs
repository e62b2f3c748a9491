//! Shared worker pool for page and resource jobs
//!
//! This module handles:
//! - A global bound on concurrently running jobs
//! - FIFO queueing of jobs submitted while the pool is full
//! - Outstanding-work tracking so the coordinator knows when a crawl is done
//!
//! Jobs never wait on other jobs. The coordinator submits work and collects
//! results, so a full pool cannot deadlock on parents waiting for children.

use futures::future::{BoxFuture, FutureExt};
use std::collections::VecDeque;
use std::future::Future;
use tokio::task::{JoinError, JoinSet};

/// Bounded pool that runs submitted futures as tokio tasks
pub struct Scheduler<T> {
    /// Maximum number of jobs running at once
    capacity: usize,

    /// Jobs waiting for a free slot, oldest first
    pending: VecDeque<BoxFuture<'static, T>>,

    /// Jobs currently running
    running: JoinSet<T>,

    /// Highest number of jobs observed running at once
    peak_running: usize,

    /// Total number of jobs ever submitted
    submitted: usize,
}

impl<T: Send + 'static> Scheduler<T> {
    /// Creates a scheduler; a capacity of 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            pending: VecDeque::new(),
            running: JoinSet::new(),
            peak_running: 0,
            submitted: 0,
        }
    }

    /// Queues a job; it starts once a slot is free
    pub fn submit<F>(&mut self, job: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.pending.push_back(job.boxed());
        self.submitted += 1;
        tracing::trace!(
            "Job submitted: {} pending, {} running",
            self.pending.len(),
            self.running.len()
        );
    }

    /// Waits for the next job to finish
    ///
    /// Free slots are filled from the queue first.
    ///
    /// # Returns
    ///
    /// * `Some(Ok(T))` - A job finished
    /// * `Some(Err(JoinError))` - A job panicked
    /// * `None` - Nothing is pending or running
    pub async fn next_completed(&mut self) -> Option<Result<T, JoinError>> {
        self.fill();
        self.running.join_next().await
    }

    fn fill(&mut self) {
        while self.running.len() < self.capacity {
            match self.pending.pop_front() {
                Some(job) => {
                    self.running.spawn(job);
                }
                None => break,
            }
        }
        self.peak_running = self.peak_running.max(self.running.len());
    }

    /// Jobs submitted but not yet finished
    pub fn outstanding(&self) -> usize {
        self.pending.len() + self.running.len()
    }

    /// Returns whether no job is pending or running
    pub fn is_idle(&self) -> bool {
        self.outstanding() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn peak_running(&self) -> usize {
        self.peak_running
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }
}
