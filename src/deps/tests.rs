//! Unit tests for prerequisite collections

use std::sync::Arc;

use crate::cell::Completion;
use crate::deps::DependencyList;
use crate::handle::Handle;
use crate::task::Task;

/// A task wrapper with a hand-driven handle. The handle is returned
/// separately so tests can walk it through its lifecycle.
fn stub_task() -> (Arc<Handle>, Task<i32>) {
    let handle = Handle::new();
    handle.set_dispatch(Box::new(|| {}));
    let cell = Arc::new(Completion::new());
    let task = Task::new(Arc::clone(&handle), cell);
    (handle, task)
}

fn finished_task() -> Task<i32> {
    let (handle, task) = stub_task();
    handle.finish_preparation();
    handle.finish();
    task
}

/// Drive a dependent with registered prerequisites to completion.
fn run_down(target: Arc<Handle>, prerequisites: Vec<Arc<Handle>>) {
    target.finish_preparation();
    for prerequisite in prerequisites {
        prerequisite.finish_preparation();
        prerequisite.finish();
    }
    target.finish();
}

#[test]
fn unit_registers_nothing() {
    let target = Handle::new();
    target.set_dispatch(Box::new(|| {}));
    assert_eq!(().register(&target), 0);
    run_down(target, Vec::new());
}

#[test]
fn single_reference_registers_one() {
    let (handle, task) = stub_task();
    let target = Handle::new();
    target.set_dispatch(Box::new(|| {}));
    assert_eq!((&task).register(&target), 1);
    run_down(target, vec![handle]);
}

#[test]
fn tuples_register_each_unfinished_prerequisite() {
    let (h1, t1) = stub_task();
    let (h2, t2) = stub_task();
    let (h3, t3) = stub_task();
    let target = Handle::new();
    target.set_dispatch(Box::new(|| {}));
    assert_eq!((&t1, &t2, &t3).register(&target), 3);
    run_down(target, vec![h1, h2, h3]);
}

#[test]
fn finished_prerequisites_are_not_counted() {
    let done = finished_task();
    let (h, pending) = stub_task();
    let target = Handle::new();
    target.set_dispatch(Box::new(|| {}));
    assert_eq!((&done, &pending).register(&target), 1);
    run_down(target, vec![h]);
}

#[test]
fn slices_register_every_element() {
    let stubs: Vec<_> = (0..5).map(|_| stub_task()).collect();
    let tasks: Vec<_> = stubs.iter().map(|(_, task)| task.clone()).collect();
    let target = Handle::new();
    target.set_dispatch(Box::new(|| {}));
    assert_eq!(tasks.as_slice().register(&target), 5);
    run_down(target, stubs.into_iter().map(|(handle, _)| handle).collect());
}

#[test]
fn all_finished_prerequisites_dispatch_immediately() {
    let done: Vec<_> = (0..3).map(|_| finished_task()).collect();
    let target = Handle::new();
    let dispatched = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = Arc::clone(&dispatched);
    target.set_dispatch(Box::new(move || {
        flag.store(true, std::sync::atomic::Ordering::SeqCst)
    }));
    assert_eq!(done.as_slice().register(&target), 0);
    target.finish_preparation();
    assert!(dispatched.load(std::sync::atomic::Ordering::SeqCst));
    target.finish();
}
