//! Bounded worker pool with an explicit completion barrier.
//!
//! # Responsibilities
//! - Drain a shared FIFO queue of boxed tasks with a fixed set of workers
//! - Track pending and in-flight work so callers can wait for full
//!   completion, not just an empty queue
//! - Shut down without leaking workers or executing queued tasks

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::{MAX_WORKERS, MIN_WORKERS};

/// A unit of work. Owned by the pool from submission until execution
/// completes; immutable once submitted.
pub type Task = BoxFuture<'static, ()>;

/// Errors surfaced by the task pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Worker count outside the supported range at creation.
    #[error("worker count {0} outside supported range 1..=64")]
    InvalidWorkerCount(usize),

    /// Submission attempted after shutdown was requested.
    #[error("pool is shut down")]
    ShutDown,
}

/// State shared between the pool handle and its workers.
struct PoolShared {
    /// Pending tasks, FIFO. Mutated only inside the critical section.
    queue: Mutex<VecDeque<Task>>,
    /// Wakes workers blocked on an empty queue.
    work_notify: Notify,
    /// Wakes `wait_idle` callers when the pool may have become idle.
    idle_notify: Notify,
    /// Tasks queued but not yet dequeued.
    pending: AtomicUsize,
    /// Tasks dequeued and currently executing.
    in_flight: AtomicUsize,
    /// Set once; workers exit instead of dequeuing after this.
    shutdown: AtomicBool,
}

impl PoolShared {
    fn is_idle(&self) -> bool {
        self.pending.load(Ordering::Acquire) == 0 && self.in_flight.load(Ordering::Acquire) == 0
    }

    fn take_task(&self) -> Option<Task> {
        let mut queue = self.queue.lock().unwrap();
        let task = queue.pop_front()?;
        // in_flight rises before pending drops so the idle predicate never
        // observes a dequeued-but-unstarted task as complete.
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        self.pending.fetch_sub(1, Ordering::AcqRel);
        Some(task)
    }
}

/// Fixed-size worker pool draining a shared FIFO queue.
///
/// Workers race for the queue head; no execution order is promised between
/// tasks. The only guarantee is the [`TaskPool::wait_idle`] barrier.
pub struct TaskPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,
}

impl TaskPool {
    /// Create a pool with `worker_count` workers.
    ///
    /// The count must lie in `MIN_WORKERS..=MAX_WORKERS`.
    pub fn new(worker_count: usize) -> Result<Self, PoolError> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&worker_count) {
            return Err(PoolError::InvalidWorkerCount(worker_count));
        }

        let shared = Arc::new(PoolShared {
            queue: Mutex::new(VecDeque::new()),
            work_notify: Notify::new(),
            idle_notify: Notify::new(),
            pending: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            shutdown: AtomicBool::new(false),
        });

        let workers = (0..worker_count)
            .map(|worker_id| {
                let shared = shared.clone();
                tokio::spawn(worker_loop(worker_id, shared))
            })
            .collect();

        tracing::debug!(worker_count, "Task pool started");

        Ok(Self {
            shared,
            workers,
            worker_count,
        })
    }

    /// Number of workers the pool was created with.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Tasks queued but not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Tasks currently executing.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// True when no task is queued or executing.
    pub fn is_idle(&self) -> bool {
        self.shared.is_idle()
    }

    /// Append a task to the queue tail and wake one waiting worker.
    ///
    /// Returns [`PoolError::ShutDown`] once shutdown has been requested;
    /// late submissions are rejected, never silently dropped.
    pub fn submit(&self, task: Task) -> Result<(), PoolError> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(PoolError::ShutDown);
        }

        {
            let mut queue = self.shared.queue.lock().unwrap();
            queue.push_back(task);
            self.shared.pending.fetch_add(1, Ordering::AcqRel);
        }
        self.shared.work_notify.notify_one();

        Ok(())
    }

    /// Block until every submitted task has fully executed.
    ///
    /// Re-checks both counters after every wake-up, so spurious wake-ups
    /// and work submitted while a wait is in progress cannot make it
    /// return early.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.shared.idle_notify.notified();
            tokio::pin!(notified);
            // Register interest before the check so a notification landing
            // in between is not lost.
            notified.as_mut().enable();

            if self.shared.is_idle() {
                return;
            }

            notified.await;
        }
    }

    /// Request shutdown, join every worker, then drop any still-queued
    /// tasks unexecuted. In-flight tasks run to completion first.
    ///
    /// Idempotent: a second call finds no workers and returns.
    pub async fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        tracing::debug!("Shutting down task pool");

        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.work_notify.notify_waiters();

        for worker in self.workers.drain(..) {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Worker terminated abnormally");
            }
        }

        let dropped = {
            let mut queue = self.shared.queue.lock().unwrap();
            let dropped = queue.len();
            queue.clear();
            dropped
        };
        if dropped > 0 {
            self.shared.pending.fetch_sub(dropped, Ordering::AcqRel);
            tracing::debug!(dropped, "Dropped queued tasks on shutdown");
        }
        // Waiters blocked across a shutdown re-check and see the drained pool.
        self.shared.idle_notify.notify_waiters();

        tracing::debug!("Task pool shut down");
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        // Drop cannot join async workers; the flag and wake-up make idle
        // workers exit on their own. `shutdown` remains the supported path.
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.work_notify.notify_waiters();
    }
}

/// Worker loop: wait for work or shutdown, dequeue, execute, settle.
async fn worker_loop(worker_id: usize, shared: Arc<PoolShared>) {
    tracing::trace!(worker_id, "Worker started");

    loop {
        let task = loop {
            let notified = shared.work_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            // Shutdown wins over queued work: tasks still queued once
            // shutdown is requested must never execute.
            if shared.shutdown.load(Ordering::Acquire) {
                break None;
            }
            if let Some(task) = shared.take_task() {
                break Some(task);
            }

            notified.await;
        };

        let Some(task) = task else {
            break;
        };

        // One misbehaving task must not take the worker down with it.
        if AssertUnwindSafe(task).catch_unwind().await.is_err() {
            tracing::error!(worker_id, "Task panicked");
        }

        if shared.in_flight.fetch_sub(1, Ordering::AcqRel) == 1
            && shared.pending.load(Ordering::Acquire) == 0
        {
            shared.idle_notify.notify_waiters();
        }
    }

    tracing::trace!(worker_id, "Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_zero_workers() {
        assert_eq!(
            TaskPool::new(0).err(),
            Some(PoolError::InvalidWorkerCount(0))
        );
    }

    #[tokio::test]
    async fn rejects_oversized_pool() {
        assert_eq!(
            TaskPool::new(MAX_WORKERS + 1).err(),
            Some(PoolError::InvalidWorkerCount(MAX_WORKERS + 1))
        );
    }

    #[tokio::test]
    async fn submit_after_shutdown_is_rejected() {
        let mut pool = TaskPool::new(2).unwrap();
        pool.shutdown().await;

        let result = pool.submit(Box::pin(async {}));
        assert_eq!(result.err(), Some(PoolError::ShutDown));
    }

    #[tokio::test]
    async fn wait_idle_returns_immediately_with_no_work() {
        let mut pool = TaskPool::new(1).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), pool.wait_idle())
            .await
            .expect("idle pool must not block wait_idle");
        pool.shutdown().await;
    }
}
