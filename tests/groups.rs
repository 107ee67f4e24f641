// Task-group scoping and synchronization tests

mod common;

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use taskdag::{submit, TaskGroup};

use common::pool;

#[test]
fn scoped_group_diamond() {
    let pool = pool(2);

    let a_val = Arc::new(AtomicI32::new(0));
    let b_val = Arc::new(AtomicI32::new(0));
    let c_val = Arc::new(AtomicI32::new(0));
    let d_val = Arc::new(AtomicI32::new(0));
    let e_val = Arc::new(AtomicI32::new(0));

    {
        let group = TaskGroup::new(&pool);
        let wa = Arc::clone(&a_val);
        let a = group.submit((), move || {
            wa.store(7, Ordering::SeqCst);
        });
        let wb = Arc::clone(&b_val);
        let b = group.submit((), move || {
            wb.store(22, Ordering::SeqCst);
        });
        let (r_a, r_b, wc) = (Arc::clone(&a_val), Arc::clone(&b_val), Arc::clone(&c_val));
        let c = group.submit((&a, &b), move || {
            wc.store(
                r_a.load(Ordering::SeqCst) + r_b.load(Ordering::SeqCst),
                Ordering::SeqCst,
            );
        });
        let wd = Arc::clone(&d_val);
        let d = group.submit((), move || {
            wd.store(13, Ordering::SeqCst);
        });
        let (r_c, r_d, we) = (Arc::clone(&c_val), Arc::clone(&d_val), Arc::clone(&e_val));
        group.submit((&c, &d), move || {
            we.store(
                r_c.load(Ordering::SeqCst) + r_d.load(Ordering::SeqCst),
                Ordering::SeqCst,
            );
        });
        // No explicit join: leaving the scope must wait for all five tasks.
    }

    assert_eq!(e_val.load(Ordering::SeqCst), 42);
}

#[test]
fn drop_waits_for_long_running_tasks() {
    let pool = pool(2);
    let finished = Arc::new(AtomicUsize::new(0));
    {
        let group = TaskGroup::new(&pool);
        for _ in 0..4 {
            let finished = Arc::clone(&finished);
            group.submit((), move || {
                thread::sleep(Duration::from_millis(40));
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }
    }
    assert_eq!(finished.load(Ordering::SeqCst), 4);
}

#[test]
fn group_and_free_tasks_can_mix() {
    let pool = pool(2);
    let free = submit(&pool, (), || 40);

    let group = TaskGroup::new(&pool);
    let input = free.clone();
    let grouped = group.submit((&free,), move || input.get() + 2);
    assert_eq!(grouped.get(), 42);
    group.join();
}

#[test]
fn join_then_reuse_then_drop() {
    let pool = pool(2);
    let counter = Arc::new(AtomicUsize::new(0));
    let group = TaskGroup::new(&pool);

    let first = Arc::clone(&counter);
    group.submit((), move || {
        first.fetch_add(1, Ordering::SeqCst);
    });
    group.join();
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let second = Arc::clone(&counter);
    group.submit((), move || {
        thread::sleep(Duration::from_millis(20));
        second.fetch_add(1, Ordering::SeqCst);
    });
    drop(group);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn many_groups_share_one_pool() {
    let pool = pool(4);
    let total = Arc::new(AtomicUsize::new(0));
    for _ in 0..8 {
        let group = TaskGroup::new(&pool);
        for _ in 0..8 {
            let total = Arc::clone(&total);
            group.submit((), move || {
                total.fetch_add(1, Ordering::SeqCst);
            });
        }
    }
    assert_eq!(total.load(Ordering::SeqCst), 64);
}
