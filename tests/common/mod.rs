// Common helpers for the integration test suite

use std::sync::Arc;

use taskdag::ThreadPool;

/// Shorthand for the shared-pool shape every test uses.
pub fn pool(threads: usize) -> Arc<ThreadPool> {
    Arc::new(ThreadPool::new(threads))
}

// Initialize tracing subscriber for tests (idempotent)
#[cfg(feature = "tracing")]
#[allow(dead_code)]
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init()
            .ok();
    });
}

#[cfg(not(feature = "tracing"))]
#[allow(dead_code)]
pub fn init_tracing() {
    // No-op when tracing is disabled
}
