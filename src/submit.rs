//! Submission front ends.
//!
//! Both front ends build a completion cell and a handle, register the
//! prerequisites, arm a dispatch closure that enqueues the callable on the
//! pool, and end the preparing phase. Submission never waits for
//! prerequisites; it returns as soon as the handle is wired into the graph.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::cell::Completion;
use crate::deps::DependencyList;
use crate::error::{panic_message, TaskError};
use crate::handle::Handle;
use crate::pool::WorkerPool;
use crate::task::{Dependable, NestedTask, Task};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Hook run on the worker after the task has finished and its dependents
/// were notified. Task groups use it to retire their active count.
pub(crate) type PostAction = Box<dyn FnOnce() + Send>;

/// Shared submission core: returns the wired-up handle and cell.
pub(crate) fn submit_with<P, D, F, R>(
    pool: &Arc<P>,
    dependencies: D,
    callable: F,
    post_action: Option<PostAction>,
) -> (Arc<Handle>, Arc<Completion<R>>)
where
    P: WorkerPool,
    D: DependencyList,
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let cell = Arc::new(Completion::new());
    let handle = Handle::new();
    let registered = dependencies.register(&handle);
    #[cfg(not(feature = "tracing"))]
    let _ = registered;

    #[cfg(feature = "tracing")]
    debug!(
        handle = handle.id(),
        prerequisites = registered,
        "task prepared"
    );

    let job_pool = Arc::clone(pool);
    let job_cell = Arc::clone(&cell);
    let job_handle = Arc::clone(&handle);
    handle.set_dispatch(Box::new(move || {
        job_pool.spawn(Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(callable)).map_err(|payload| {
                TaskError::Panicked {
                    message: panic_message(payload.as_ref()),
                }
            });
            // The result must be observable before any dependent can run:
            // publish first, notify second.
            job_cell.fulfill(outcome);
            job_handle.finish();
            if let Some(post_action) = post_action {
                post_action();
            }
        }));
    }));
    handle.finish_preparation();
    (handle, cell)
}

/// Submit a callable to `pool` once every task in `dependencies` has
/// finished.
///
/// Returns immediately with a [`Task`] for the eventual result; the
/// callable runs on a worker thread as soon as its prerequisites resolve
/// (right away if there are none). Callables may themselves submit further
/// tasks against the same pool.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use taskdag::{submit, ThreadPool};
///
/// let pool = Arc::new(ThreadPool::new(2));
/// let a = submit(&pool, (), || 7);
/// let b = submit(&pool, (), || 22);
/// let (ra, rb) = (a.clone(), b.clone());
/// let sum = submit(&pool, (&a, &b), move || ra.get() + rb.get());
/// assert_eq!(sum.get(), 29);
/// ```
pub fn submit<P, D, F, R>(pool: &Arc<P>, dependencies: D, callable: F) -> Task<R>
where
    P: WorkerPool,
    D: DependencyList,
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (handle, cell) = submit_with(pool, dependencies, callable, None);
    Task::new(handle, cell)
}

/// Submit a callable whose result is itself a task.
///
/// The returned [`NestedTask`] flattens the indirection: waiting on it (or
/// depending on it) waits for the *inner* task, and
/// [`NestedTask::get_value`] returns the inner task's value. This is the
/// natural shape for recursive task graphs, where a callable builds and
/// submits its own subgraph and hands back the subgraph's root.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use taskdag::{submit, submit_nested, ThreadPool};
///
/// let pool = Arc::new(ThreadPool::new(1));
/// let inner_pool = Arc::clone(&pool);
/// let task = submit_nested(&pool, (), move || {
///     // Runs on a worker; submits the real work and returns its task.
///     submit(&inner_pool, (), || "computed".to_string())
/// });
/// assert_eq!(task.get_value(), "computed");
/// ```
pub fn submit_nested<P, D, F, W>(pool: &Arc<P>, dependencies: D, callable: F) -> NestedTask<W>
where
    P: WorkerPool,
    D: DependencyList,
    F: FnOnce() -> W + Send + 'static,
    W: Dependable,
{
    let (handle, cell) = submit_with(pool, dependencies, callable, None);
    NestedTask::new(handle, cell)
}

#[cfg(test)]
mod tests;
