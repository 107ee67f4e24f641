//! Unit tests for the submission front ends

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::pool::ThreadPool;
use crate::submit::submit;

#[test]
fn zero_prerequisite_tasks_dispatch_immediately() {
    let pool = Arc::new(ThreadPool::new(1));
    let task = submit(&pool, (), || 1);
    assert_eq!(task.get(), 1);
}

#[test]
fn prerequisite_side_effects_are_visible_to_dependents() {
    let pool = Arc::new(ThreadPool::new(4));
    let marker = Arc::new(AtomicBool::new(false));

    let setter = Arc::clone(&marker);
    let first = submit(&pool, (), move || {
        thread::sleep(Duration::from_millis(20));
        setter.store(true, Ordering::SeqCst);
    });

    let reader = Arc::clone(&marker);
    let second = submit(&pool, (&first,), move || reader.load(Ordering::SeqCst));
    assert!(second.get(), "dependent ran before its prerequisite finished");
}

#[test]
fn dependents_read_fully_published_values() {
    let pool = Arc::new(ThreadPool::new(4));
    let source = submit(&pool, (), || vec![1, 2, 3]);
    let input = source.clone();
    let sum = submit(&pool, (&source,), move || input.get().iter().sum::<i32>());
    assert_eq!(sum.get(), 6);
}

#[test]
fn already_finished_prerequisites_do_not_stall_submission() {
    let pool = Arc::new(ThreadPool::new(2));
    let first = submit(&pool, (), || 21);
    first.join();

    let input = first.clone();
    let second = submit(&pool, (&first,), move || input.get() * 2);
    assert_eq!(second.get(), 42);
}

#[test]
fn callables_may_submit_further_tasks() {
    let pool = Arc::new(ThreadPool::new(1));
    let spawner = Arc::clone(&pool);
    let outer = submit(&pool, (), move || {
        let inner = submit(&spawner, (), || 10);
        // The inner task cannot be awaited here on a single-worker pool;
        // hand it back instead.
        inner
    });
    assert_eq!(outer.get().get(), 10);
}

#[test]
fn unit_results_work_like_any_other() {
    let pool = Arc::new(ThreadPool::new(1));
    let task = submit(&pool, (), || {});
    task.join();
    task.get();
    assert_eq!(task.try_get(), Ok(()));
}

#[test]
fn many_dependents_on_one_prerequisite() {
    let pool = Arc::new(ThreadPool::new(4));
    let root = submit(&pool, (), || 1);
    let dependents: Vec<_> = (0..32)
        .map(|i| {
            let input = root.clone();
            submit(&pool, (&root,), move || input.get() + i)
        })
        .collect();
    for (i, dependent) in dependents.into_iter().enumerate() {
        assert_eq!(dependent.get(), 1 + i as i32);
    }
}
