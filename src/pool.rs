//! Worker pool collaborator.
//!
//! The task layer only needs a place to enqueue zero-argument units of
//! work; [`WorkerPool`] is that seam, and [`ThreadPool`] is the bundled
//! implementation. Any pool works as long as enqueuing never blocks and
//! queued work eventually runs; that is what keeps recursive submission
//! from inside a running task safe even on a single worker thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

#[cfg(feature = "tracing")]
use tracing::{debug, error};

/// A unit of work accepted by a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Anything that can run queued jobs on worker threads.
///
/// Requirements on implementations:
/// - `spawn` must not block waiting for a worker; jobs may themselves call
///   `spawn`.
/// - Every accepted job eventually runs, including jobs still queued when
///   the pool shuts down.
/// - The pool must outlive every task submitted against it; the submission
///   front ends hold it through an `Arc` precisely so that pending
///   dispatches keep it alive.
pub trait WorkerPool: Send + Sync + 'static {
    /// Enqueue a job for execution on some worker thread.
    fn spawn(&self, job: Job);
}

/// Fixed-size pool of worker threads over an unbounded job queue.
///
/// Dropping the pool disconnects the queue and joins the workers; queued
/// jobs are drained before the workers exit.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use taskdag::{ThreadPool, WorkerPool};
///
/// let pool = ThreadPool::new(2);
/// let counter = Arc::new(AtomicUsize::new(0));
/// for _ in 0..8 {
///     let counter = Arc::clone(&counter);
///     pool.spawn(Box::new(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }));
/// }
/// drop(pool); // drains the queue
/// assert_eq!(counter.load(Ordering::SeqCst), 8);
/// ```
pub struct ThreadPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Start a pool with `threads` worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `threads` is zero or a worker thread cannot be spawned.
    pub fn new(threads: usize) -> Self {
        assert!(threads > 0, "a worker pool needs at least one thread");
        let (sender, receiver) = unbounded::<Job>();
        let workers = (0..threads)
            .map(|index| {
                let receiver = receiver.clone();
                thread::Builder::new()
                    .name(format!("taskdag-worker-{index}"))
                    .spawn(move || {
                        for job in receiver.iter() {
                            // A panicking job must not take the worker down
                            // with it; jobs queued behind it still have to
                            // run.
                            let outcome = catch_unwind(AssertUnwindSafe(job));
                            #[cfg(feature = "tracing")]
                            if outcome.is_err() {
                                error!(worker = index, "job panicked on worker thread");
                            }
                            #[cfg(not(feature = "tracing"))]
                            let _ = outcome;
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();
        #[cfg(feature = "tracing")]
        debug!(threads, "worker pool started");
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.workers.len()
    }
}

impl WorkerPool for ThreadPool {
    fn spawn(&self, job: Job) {
        self.sender
            .as_ref()
            .expect("worker pool is shutting down")
            .send(job)
            .expect("all worker threads have exited");
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        #[cfg(feature = "tracing")]
        debug!(threads = self.workers.len(), "worker pool draining");
        // Disconnect the queue; workers finish the remaining jobs and exit.
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
