//! Task wrappers pairing a dependency handle with a completion cell.
//!
//! [`Task<T>`] wraps a callable's plain result. [`NestedTask<W>`] wraps a
//! callable whose result is itself a task; it grafts an indirection chain
//! onto the graph so that anything depending on it waits for the *inner*
//! task, and value retrieval unwraps through the nesting.

use std::sync::Arc;

use crate::cell::Completion;
use crate::error::TaskResult;
use crate::handle::Handle;

/// A task another submission can wait on.
///
/// Implemented by [`Task`] and [`NestedTask`]; prerequisite collections are
/// built from references to either (see [`crate::DependencyList`]).
pub trait Dependency {
    /// The handle a dependent must wait on. For a plain task this is its
    /// own vertex; for a nested task it is the tail of the indirection
    /// chain, which only completes once the inner task has.
    #[doc(hidden)]
    fn dependency_handle(&self) -> &Arc<Handle>;
}

/// A task whose innermost value can be awaited and retrieved.
///
/// `Value` unwraps through any depth of task nesting: for `Task<T>` it is
/// `T`, for `NestedTask<Task<T>>` it is still `T`. This is the seam that
/// lets a callable hand back another task and have consumers treat the
/// pair as one.
pub trait Dependable: Dependency + Clone + Send + 'static {
    /// The innermost value produced once every nesting level has completed.
    type Value;

    /// Block until the innermost task has completed.
    fn join(&self);

    /// Block and return a copy of the innermost value.
    ///
    /// # Panics
    ///
    /// Re-raises the failure of any callable along the nesting chain.
    fn get_value(&self) -> Self::Value;

    /// Non-panicking variant of [`Dependable::get_value`].
    fn try_get_value(&self) -> TaskResult<Self::Value>;
}

/// Shared wrapper around a submitted task and its eventual result.
///
/// Tasks are cheap to clone; downstream callables typically capture clones
/// of their prerequisites and read them with [`Task::get`] once dispatched.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use taskdag::{submit, ThreadPool};
///
/// let pool = Arc::new(ThreadPool::new(2));
/// let base = submit(&pool, (), || 20);
/// let copy = base.clone();
/// let doubled = submit(&pool, (&base,), move || copy.get() * 2);
/// assert_eq!(doubled.get(), 40);
/// ```
pub struct Task<T> {
    handle: Arc<Handle>,
    cell: Arc<Completion<T>>,
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Send + 'static> Task<T> {
    pub(crate) fn new(handle: Arc<Handle>, cell: Arc<Completion<T>>) -> Self {
        Self { handle, cell }
    }

    /// Block until the task has completed. Never panics, even if the
    /// callable did.
    pub fn join(&self) {
        self.cell.wait();
    }

    /// Block until completed, then return a copy of the result.
    ///
    /// # Panics
    ///
    /// Re-raises the callable's panic if the task failed.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match self.cell.get() {
            Ok(value) => value,
            Err(err) => err.raise(),
        }
    }

    /// Alias for [`Task::get`]; on nested tasks the same name unwraps
    /// through the nesting, so generic graph code can call `get_value`
    /// uniformly.
    pub fn get_value(&self) -> T
    where
        T: Clone,
    {
        self.get()
    }

    /// Block until completed, then return the result or the captured
    /// failure.
    pub fn try_get(&self) -> TaskResult<T>
    where
        T: Clone,
    {
        self.cell.get()
    }
}

impl<T> std::fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("handle", &self.handle).finish()
    }
}

impl<T> Dependency for Task<T> {
    fn dependency_handle(&self) -> &Arc<Handle> {
        &self.handle
    }
}

impl<T: Clone + Send + 'static> Dependable for Task<T> {
    type Value = T;

    fn join(&self) {
        Task::join(self);
    }

    fn get_value(&self) -> T {
        Task::get_value(self)
    }

    fn try_get_value(&self) -> TaskResult<T> {
        Task::try_get(self)
    }
}

/// A task whose callable produces another task.
///
/// Depending on a `NestedTask` means waiting for the *inner* task, not
/// merely the callable that produced it. The inner task is unknown until
/// the outer callable runs, so the constructor plants a two-handle
/// indirection chain in the graph:
///
/// - `outer_aux` depends on the wrapper's own handle; once dispatched it
///   reads the inner task out of the completion cell and registers the
///   inner task's handle with `inner_aux`.
/// - `inner_aux` completes only after both `outer_aux` and the inner task
///   have finished. It is the handle dependents actually wait on.
///
/// The same graph primitives drive both halves of the chain; the scheduler
/// has no nested-task special case.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use taskdag::{submit, submit_nested, ThreadPool};
///
/// let pool = Arc::new(ThreadPool::new(2));
/// let inner_pool = Arc::clone(&pool);
/// let nested = submit_nested(&pool, (), move || {
///     submit(&inner_pool, (), || 6 * 7)
/// });
/// assert_eq!(nested.get_value(), 42);
/// ```
pub struct NestedTask<W: Dependable> {
    handle: Arc<Handle>,
    /// Tail of the indirection chain; finishes once the inner task has.
    nested: Arc<Handle>,
    cell: Arc<Completion<W>>,
}

impl<W: Dependable> Clone for NestedTask<W> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            nested: Arc::clone(&self.nested),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<W: Dependable> NestedTask<W> {
    pub(crate) fn new(handle: Arc<Handle>, cell: Arc<Completion<W>>) -> Self {
        let outer_aux = Handle::new();
        let inner_aux = Handle::new();

        // inner_aux's dispatch runs on whichever thread resolves its last
        // prerequisite; it only flips graph state, so it completes inline
        // instead of taking a round-trip through the pool.
        let noop = Arc::clone(&inner_aux);
        inner_aux.set_dispatch(Box::new(move || noop.finish()));
        inner_aux.add_dependency(&outer_aux);

        let chain_cell = Arc::clone(&cell);
        let chain_inner = Arc::clone(&inner_aux);
        let chain_outer = Arc::clone(&outer_aux);
        outer_aux.set_dispatch(Box::new(move || {
            // The outer callable has published by the time this runs. A
            // failed callable leaves no inner task behind; the chain still
            // completes so that dependents run (and fail at value access).
            if let Some(Ok(inner)) = chain_cell.try_peek() {
                chain_inner.add_dependency(inner.dependency_handle());
            }
            chain_inner.finish_preparation();
            chain_outer.finish();
        }));
        outer_aux.add_dependency(&handle);
        outer_aux.finish_preparation();

        Self {
            handle,
            nested: inner_aux,
            cell,
        }
    }

    /// Block until the inner task has completed.
    pub fn join(&self) {
        if let Ok(inner) = self.cell.get() {
            inner.join();
        }
    }

    /// Block until the outer callable has completed, then return the inner
    /// task without waiting for it.
    ///
    /// # Panics
    ///
    /// Re-raises the outer callable's panic if it failed.
    pub fn get(&self) -> W {
        match self.cell.get() {
            Ok(inner) => inner,
            Err(err) => err.raise(),
        }
    }

    /// Block until the inner task has completed, then return a copy of its
    /// value, unwrapping through every nesting level.
    ///
    /// # Panics
    ///
    /// Re-raises the failure of any callable along the chain.
    pub fn get_value(&self) -> W::Value {
        self.get().get_value()
    }

    /// Non-panicking variant of [`NestedTask::get`].
    pub fn try_get(&self) -> TaskResult<W> {
        self.cell.get()
    }

    /// Non-panicking variant of [`NestedTask::get_value`].
    pub fn try_get_value(&self) -> TaskResult<W::Value> {
        self.cell.get().and_then(|inner| inner.try_get_value())
    }
}

impl<W: Dependable> std::fmt::Debug for NestedTask<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedTask")
            .field("handle", &self.handle)
            .field("nested", &self.nested)
            .finish()
    }
}

impl<W: Dependable> Dependency for NestedTask<W> {
    fn dependency_handle(&self) -> &Arc<Handle> {
        &self.nested
    }
}

impl<W: Dependable> Dependable for NestedTask<W> {
    type Value = W::Value;

    fn join(&self) {
        NestedTask::join(self);
    }

    fn get_value(&self) -> W::Value {
        NestedTask::get_value(self)
    }

    fn try_get_value(&self) -> TaskResult<W::Value> {
        NestedTask::try_get_value(self)
    }
}
