//! Dependency-graph vertices and the deferred-submission protocol.
//!
//! Every submitted task owns one [`Handle`], a vertex in the directed
//! dependency graph. A handle collects prerequisites while the submission
//! front end prepares it, then either dispatches immediately or waits until
//! the last prerequisite's completion notification releases it.
//!
//! Dispatch actions and completion notifications always run with the
//! handle's lock released, so pool code and other handles are never entered
//! under a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::trace;

/// Action that hands the task's callable to the worker pool.
///
/// Installed exactly once while the handle is preparing and consumed at the
/// transition into `Submitted`.
pub(crate) type Dispatch = Box<dyn FnOnce() + Send>;

/// Lifecycle of a handle.
///
/// Transitions are monotonic: `Preparing` → (`Waiting` →)? `Submitted` →
/// `Finished`. `Waiting` is skipped when every prerequisite has already
/// resolved by the end of the preparing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Still collecting prerequisites and the dispatch action.
    Preparing,
    /// Preparation done, one or more prerequisites outstanding.
    Waiting,
    /// Handed to the worker pool.
    Submitted,
    /// Callable returned and all dependents were notified.
    Finished,
}

struct Inner {
    state: State,
    /// Unresolved prerequisites. Incremented only while `Preparing`,
    /// decremented only by a prerequisite's completion notification.
    remaining: usize,
    dispatch: Option<Dispatch>,
    /// Handles to notify when this one finishes, in registration order.
    dependents: Vec<Arc<Handle>>,
}

impl Inner {
    /// Transition into `Submitted` and surrender the dispatch action to the
    /// caller, which must invoke it after releasing the lock.
    fn enqueue(&mut self) -> Dispatch {
        self.state = State::Submitted;
        self.dispatch.take().expect("no dispatch action armed")
    }
}

/// A vertex in the dependency graph.
///
/// Handles are shared: the owning task wrapper, the `dependents` lists of
/// its prerequisites, and its own dispatch closure all hold references.
/// `finish` clears the dependents list and `enqueue` consumes the dispatch
/// slot, so a completed graph sheds its references promptly.
pub struct Handle {
    id: u64,
    inner: Mutex<Inner>,
}

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(0);

impl Handle {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            inner: Mutex::new(Inner {
                state: State::Preparing,
                remaining: 0,
                dispatch: None,
                dependents: Vec::new(),
            }),
        })
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Install the dispatch action. May only happen once, while preparing.
    pub(crate) fn set_dispatch(&self, dispatch: Dispatch) {
        let mut inner = self.inner.lock();
        assert_eq!(
            inner.state,
            State::Preparing,
            "dispatch armed outside the preparing phase"
        );
        assert!(inner.dispatch.is_none(), "dispatch armed twice");
        inner.dispatch = Some(dispatch);
    }

    /// Register `self` as a dependent of `prerequisite`.
    ///
    /// Returns `false` when the prerequisite has already finished; the
    /// completion event for that edge is implicit and `remaining` is left
    /// untouched. `self` stays locked across the registration so a
    /// prerequisite finishing concurrently cannot notify us before
    /// `remaining` accounts for the new edge.
    pub(crate) fn add_dependency(self: &Arc<Self>, prerequisite: &Arc<Handle>) -> bool {
        let mut inner = self.inner.lock();
        assert_eq!(
            inner.state,
            State::Preparing,
            "dependency added outside the preparing phase"
        );
        if prerequisite.add_dependent(Arc::clone(self)) {
            inner.remaining += 1;
            #[cfg(feature = "tracing")]
            trace!(
                handle = self.id,
                prerequisite = prerequisite.id,
                remaining = inner.remaining,
                "dependency registered"
            );
            true
        } else {
            #[cfg(feature = "tracing")]
            trace!(
                handle = self.id,
                prerequisite = prerequisite.id,
                "prerequisite already finished, registration skipped"
            );
            false
        }
    }

    /// Enlist `dependent` for notification when this handle finishes.
    ///
    /// Returns `false` if this handle is already finished.
    pub(crate) fn add_dependent(&self, dependent: Arc<Handle>) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == State::Finished {
            false
        } else {
            inner.dependents.push(dependent);
            true
        }
    }

    /// End the preparing phase: dispatch now if every prerequisite has
    /// resolved, otherwise start waiting for the outstanding ones.
    pub(crate) fn finish_preparation(&self) {
        let dispatch = {
            let mut inner = self.inner.lock();
            assert_eq!(
                inner.state,
                State::Preparing,
                "preparation finished twice"
            );
            if inner.remaining == 0 {
                Some(inner.enqueue())
            } else {
                inner.state = State::Waiting;
                #[cfg(feature = "tracing")]
                trace!(
                    handle = self.id,
                    remaining = inner.remaining,
                    "waiting for prerequisites"
                );
                None
            }
        };
        if let Some(dispatch) = dispatch {
            #[cfg(feature = "tracing")]
            trace!(handle = self.id, "dispatching with no outstanding prerequisites");
            dispatch();
        }
    }

    /// Completion notification from one of our prerequisites.
    pub(crate) fn remove_dependency(&self) {
        let dispatch = {
            let mut inner = self.inner.lock();
            debug_assert!(inner.remaining > 0, "notification without a registered edge");
            inner.remaining -= 1;
            #[cfg(feature = "tracing")]
            trace!(
                handle = self.id,
                remaining = inner.remaining,
                "prerequisite finished"
            );
            if inner.remaining > 0 {
                None
            } else {
                match inner.state {
                    // The submission front end is still preparing this
                    // handle; finish_preparation will observe remaining == 0
                    // and dispatch.
                    State::Preparing => None,
                    State::Waiting => Some(inner.enqueue()),
                    state => unreachable!("prerequisite notified a {state:?} handle"),
                }
            }
        };
        if let Some(dispatch) = dispatch {
            #[cfg(feature = "tracing")]
            trace!(handle = self.id, "last prerequisite resolved, dispatching");
            dispatch();
        }
    }

    /// Mark the task finished and notify every dependent.
    ///
    /// The caller must have published the task's result first; dependents
    /// released here may start running immediately on another worker.
    pub(crate) fn finish(&self) {
        let dependents = {
            let mut inner = self.inner.lock();
            assert_eq!(
                inner.state,
                State::Submitted,
                "finish on a task that was never dispatched"
            );
            inner.state = State::Finished;
            std::mem::take(&mut inner.dependents)
        };
        #[cfg(feature = "tracing")]
        trace!(
            handle = self.id,
            dependents = dependents.len(),
            "finished, notifying dependents"
        );
        for dependent in dependents {
            dependent.remove_dependency();
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            debug_assert_eq!(
                self.inner.get_mut().state,
                State::Finished,
                "handle dropped before its task finished"
            );
        }
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("state", &inner.state)
            .field("remaining", &inner.remaining)
            .field("dependents", &inner.dependents.len())
            .finish()
    }
}
