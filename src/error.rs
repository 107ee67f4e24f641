//! Error types for task submission and result retrieval.
//!
//! A failing callable does not disturb the dependency graph; its failure is
//! captured and surfaces only when a consumer retrieves the value.

/// Errors observable through [`crate::Task::try_get`] and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    /// The task's callable panicked while running on the worker pool.
    Panicked { message: String },
}

impl TaskError {
    /// Re-raise the captured failure on the calling thread.
    pub(crate) fn raise(self) -> ! {
        match self {
            TaskError::Panicked { message } => panic!("{message}"),
        }
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Panicked { message } => {
                write!(f, "task panicked during execution: {message}")
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// Result type for fallible task operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Render a panic payload into a message that can be shared between
/// consumers. The payload itself cannot be cloned, so it is stringified
/// once, at capture time.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
