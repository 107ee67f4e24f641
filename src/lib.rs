//! Dependency-Aware Task Submission
//!
//! A small layer over a worker-thread pool that defers each task's
//! dispatch until all of its prerequisite tasks have finished. Tasks carry
//! a typed result that downstream tasks consume, and task groups turn a
//! lexical scope into a synchronization point.
//!
//! # Features
//!
//! - **Deferred dispatch**: submit work together with the tasks it depends
//!   on; it reaches the pool only once every prerequisite has completed.
//! - **Typed results**: a [`Task<T>`] hands back `T` to any number of
//!   consumers; downstream callables capture their inputs and read them
//!   with [`Task::get`].
//! - **Nested tasks**: a callable may build and submit its own subgraph
//!   and return the subgraph's root; [`submit_nested`] flattens the
//!   indirection so waiters and dependents observe the *inner* task.
//! - **Scoped groups**: a [`TaskGroup`] joins every task submitted through
//!   it when dropped.
//! - **Pool-agnostic**: anything implementing [`WorkerPool`] will do; a
//!   fixed-size [`ThreadPool`] is included.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use taskdag::{submit, ThreadPool};
//!
//! let pool = Arc::new(ThreadPool::new(2));
//!
//! // Source tasks with no prerequisites dispatch immediately.
//! let a = submit(&pool, (), || 7);
//! let b = submit(&pool, (), || 22);
//!
//! // `c` waits for both; its callable reads their published values.
//! let (ra, rb) = (a.clone(), b.clone());
//! let c = submit(&pool, (&a, &b), move || ra.get() + rb.get());
//!
//! let d = submit(&pool, (), || 13);
//! let (rc, rd) = (c.clone(), d.clone());
//! let e = submit(&pool, (&c, &d), move || rc.get() + rd.get());
//!
//! assert_eq!(e.get(), 42);
//! ```
//!
//! # Core Concepts
//!
//! ## Submission
//!
//! [`submit`] takes the pool, a prerequisite collection, and a callable.
//! Prerequisites come as `()`, a single reference, a tuple of references
//! (mixed result types, up to 8), or a slice:
//!
//! ```
//! use std::sync::Arc;
//! use taskdag::{submit, ThreadPool};
//!
//! let pool = Arc::new(ThreadPool::new(2));
//! let parts: Vec<_> = (0..4).map(|i| submit(&pool, (), move || i)).collect();
//! let inputs = parts.clone();
//! let total = submit(&pool, &parts[..], move || {
//!     inputs.iter().map(|part| part.get()).sum::<i32>()
//! });
//! assert_eq!(total.get(), 6);
//! ```
//!
//! Submission never blocks: it wires the task into the dependency graph
//! and returns. Completion of each prerequisite happens-before the
//! dependent callable starts, and a prerequisite's result is published
//! before any dependent runs, so `get` inside a dependent never waits.
//!
//! ## Nested tasks and recursion
//!
//! Callables are free to submit more tasks, which makes recursive graphs
//! natural. A recursive callable cannot block on its subtasks (that would
//! occupy a worker); instead it returns the combining task itself, and
//! [`submit_nested`] makes the wrapper transparent:
//!
//! ```
//! use std::sync::Arc;
//! use taskdag::{submit, submit_nested, Task, ThreadPool};
//!
//! fn fib(pool: &Arc<ThreadPool>, n: u64) -> Task<u64> {
//!     if n <= 1 {
//!         return submit(pool, (), move || n);
//!     }
//!     let a = fib(pool, n - 1);
//!     let b = fib(pool, n - 2);
//!     let (ra, rb) = (a.clone(), b.clone());
//!     submit(pool, (&a, &b), move || ra.get() + rb.get())
//! }
//!
//! let pool = Arc::new(ThreadPool::new(1));
//! let graph_pool = Arc::clone(&pool);
//! let result = submit_nested(&pool, (), move || fib(&graph_pool, 6));
//! assert_eq!(result.get_value(), 8);
//! ```
//!
//! This runs to completion even on a single worker thread: no callable
//! ever waits for an unfinished task, because every `get` sits behind a
//! dependency edge.
//!
//! ## Task groups
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use taskdag::{TaskGroup, ThreadPool};
//!
//! let pool = Arc::new(ThreadPool::new(2));
//! let hits = Arc::new(AtomicI32::new(0));
//! {
//!     let group = TaskGroup::new(&pool);
//!     for _ in 0..16 {
//!         let hits = Arc::clone(&hits);
//!         group.submit((), move || {
//!             hits.fetch_add(1, Ordering::SeqCst);
//!         });
//!     }
//!     // Dropping the group waits for all 16 tasks.
//! }
//! assert_eq!(hits.load(Ordering::SeqCst), 16);
//! ```
//!
//! # Error Handling
//!
//! A panicking callable does not stall the graph: its task still finishes
//! and dependents still run. The failure is captured and re-raised at
//! value access: [`Task::get`] and [`Task::get_value`] panic with the
//! original message, while [`Task::try_get`] returns a [`TaskError`]:
//!
//! ```
//! use std::sync::Arc;
//! use taskdag::{submit, TaskError, ThreadPool};
//!
//! let pool = Arc::new(ThreadPool::new(1));
//! let bad: taskdag::Task<i32> = submit(&pool, (), || panic!("no input"));
//! match bad.try_get() {
//!     Err(TaskError::Panicked { message }) => assert_eq!(message, "no input"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
//!
//! Dependency cycles are not detected; a cyclic graph simply never
//! dispatches the tasks on the cycle.
//!
//! # Optional Tracing Support
//!
//! The `tracing` cargo feature instruments the dependency protocol (handle
//! state transitions, prerequisite counts, group activity) through the
//! `tracing` crate. With the feature disabled, the default, the
//! instrumentation is compiled out entirely and the `tracing` crate is not
//! even linked.
//!
//! ```toml
//! [dependencies]
//! taskdag = { version = "0.1", features = ["tracing"] }
//! tracing-subscriber = "0.3"
//! ```

#![allow(private_bounds, private_interfaces)]

mod cell;
mod deps;
mod error;
mod group;
mod handle;
mod pool;
mod submit;
mod task;

pub use deps::DependencyList;
pub use error::{TaskError, TaskResult};
pub use group::TaskGroup;
pub use pool::{Job, ThreadPool, WorkerPool};
pub use submit::{submit, submit_nested};
pub use task::{Dependable, Dependency, NestedTask, Task};
