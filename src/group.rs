//! Task groups: scoped aggregation of in-flight tasks.
//!
//! A group counts every task submitted through it and lets callers block
//! until all of them have finished. Dropping a group joins it, so a scoped
//! group doubles as a synchronization point: when the scope exits, all of
//! its tasks are done.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::deps::DependencyList;
use crate::pool::WorkerPool;
use crate::submit::{submit_with, PostAction};
use crate::task::{Dependable, NestedTask, Task};

/// In-flight task count shared with the post-action closures.
struct ActiveCount {
    count: Mutex<usize>,
    idle: Condvar,
}

impl ActiveCount {
    fn increment(&self) -> usize {
        let mut count = self.count.lock();
        *count += 1;
        *count
    }

    fn decrement(&self) {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "group count retired below zero");
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

/// Scoped collection of tasks sharing one worker pool.
///
/// [`TaskGroup::join`] blocks until every task submitted through the group
/// has finished; dropping the group joins implicitly. A group may be
/// reused after a join.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use taskdag::{TaskGroup, ThreadPool};
///
/// let pool = Arc::new(ThreadPool::new(2));
/// let total = Arc::new(AtomicI32::new(0));
/// {
///     let group = TaskGroup::new(&pool);
///     for i in 1..=10 {
///         let total = Arc::clone(&total);
///         group.submit((), move || {
///             total.fetch_add(i, Ordering::SeqCst);
///         });
///     }
/// } // scope exit joins the group
/// assert_eq!(total.load(Ordering::SeqCst), 55);
/// ```
pub struct TaskGroup<P: WorkerPool> {
    pool: Arc<P>,
    active: Arc<ActiveCount>,
}

impl<P: WorkerPool> TaskGroup<P> {
    /// Create a group submitting against `pool`.
    pub fn new(pool: &Arc<P>) -> Self {
        Self {
            pool: Arc::clone(pool),
            active: Arc::new(ActiveCount {
                count: Mutex::new(0),
                idle: Condvar::new(),
            }),
        }
    }

    fn retire_action(&self) -> PostAction {
        let active = Arc::clone(&self.active);
        Box::new(move || active.decrement())
    }

    /// Submit a callable through this group; counts toward [`join`].
    ///
    /// Equivalent to [`crate::submit`] otherwise.
    ///
    /// [`join`]: TaskGroup::join
    pub fn submit<D, F, R>(&self, dependencies: D, callable: F) -> Task<R>
    where
        D: DependencyList,
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        // The count must cover the task before its dispatch can fire: a
        // task without prerequisites goes straight into the pool and could
        // otherwise retire a count that was never taken.
        let active = self.active.increment();
        #[cfg(not(feature = "tracing"))]
        let _ = active;
        #[cfg(feature = "tracing")]
        debug!(active, "group task submitted");
        let (handle, cell) =
            submit_with(&self.pool, dependencies, callable, Some(self.retire_action()));
        Task::new(handle, cell)
    }

    /// Submit a callable whose result is itself a task; counts toward
    /// [`join`].
    ///
    /// The group counts the *outer* callable. Inner tasks submitted by it
    /// through the same group count separately.
    ///
    /// Equivalent to [`crate::submit_nested`] otherwise.
    ///
    /// [`join`]: TaskGroup::join
    pub fn submit_nested<D, F, W>(&self, dependencies: D, callable: F) -> NestedTask<W>
    where
        D: DependencyList,
        F: FnOnce() -> W + Send + 'static,
        W: Dependable,
    {
        let active = self.active.increment();
        #[cfg(not(feature = "tracing"))]
        let _ = active;
        #[cfg(feature = "tracing")]
        debug!(active, "group task submitted");
        let (handle, cell) = submit_with(&self.pool, dependencies, callable, Some(self.retire_action()));
        NestedTask::new(handle, cell)
    }

    /// Block until every task submitted through this group has finished.
    ///
    /// Idempotent; a joined group accepts further submissions.
    pub fn join(&self) {
        self.active.wait_idle();
    }
}

impl<P: WorkerPool> Drop for TaskGroup<P> {
    fn drop(&mut self) {
        self.join();
    }
}
