//! One-shot completion cell delivering a task's result.
//!
//! Each submitted task owns one `Completion<T>`. The worker publishes the
//! callable's outcome exactly once; any number of consumers may block on it
//! and read the published value afterwards.

use parking_lot::{Condvar, Mutex};

use crate::error::TaskResult;

/// Single-producer, multi-consumer completion cell.
///
/// Publication is one-shot: a second `fulfill` is a logic error in the
/// submission machinery and asserts. Consumers clone the published value
/// out of the cell, so reads never contend beyond the slot lock.
pub(crate) struct Completion<T> {
    slot: Mutex<Option<TaskResult<T>>>,
    ready: Condvar,
}

impl<T> Completion<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Publish the outcome and wake every waiter.
    pub(crate) fn fulfill(&self, outcome: TaskResult<T>) {
        let mut slot = self.slot.lock();
        assert!(slot.is_none(), "completion cell fulfilled twice");
        *slot = Some(outcome);
        self.ready.notify_all();
    }

    /// Block until the outcome has been published.
    pub(crate) fn wait(&self) {
        let mut slot = self.slot.lock();
        while slot.is_none() {
            self.ready.wait(&mut slot);
        }
    }

    /// Block until published, then return a copy of the outcome.
    pub(crate) fn get(&self) -> TaskResult<T>
    where
        T: Clone,
    {
        let mut slot = self.slot.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            self.ready.wait(&mut slot);
        }
    }

    /// Non-blocking read of the outcome, if already published.
    pub(crate) fn try_peek(&self) -> Option<TaskResult<T>>
    where
        T: Clone,
    {
        self.slot.lock().clone()
    }
}
