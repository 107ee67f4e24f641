// Smoke test for the optional tracing instrumentation. Compiled only with
// `--features tracing`; the instrumentation must not change behavior.
#![cfg(feature = "tracing")]

mod common;

use taskdag::submit;

use common::{init_tracing, pool};

#[test]
fn instrumented_diamond_still_computes() {
    init_tracing();
    let pool = pool(2);
    let a = submit(&pool, (), || 7);
    let b = submit(&pool, (), || 22);
    let (ra, rb) = (a.clone(), b.clone());
    let c = submit(&pool, (&a, &b), move || ra.get() + rb.get());
    assert_eq!(c.get(), 29);
}
