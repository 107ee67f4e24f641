//! Prerequisite collections accepted by the submission front ends.
//!
//! Dependencies can be given as `()` (none), a single task reference, a
//! tuple of task references (mixed wrapper and value types), or a slice of
//! tasks of one type. Tuple support is macro-generated per arity.
//!
//! This trait is not meant for external implementation; use the provided
//! forms.

use std::sync::Arc;

use crate::handle::Handle;
use crate::task::Dependency;

/// A collection of prerequisite tasks.
pub trait DependencyList {
    /// Register every prerequisite with `handle`, returning how many
    /// registrations took effect (prerequisites that already finished do
    /// not count).
    #[doc(hidden)]
    fn register(&self, handle: &Arc<Handle>) -> usize;
}

impl DependencyList for () {
    fn register(&self, _handle: &Arc<Handle>) -> usize {
        0
    }
}

impl<D: Dependency> DependencyList for &D {
    fn register(&self, handle: &Arc<Handle>) -> usize {
        usize::from(handle.add_dependency(self.dependency_handle()))
    }
}

impl<D: Dependency> DependencyList for &[D] {
    fn register(&self, handle: &Arc<Handle>) -> usize {
        self.iter()
            .filter(|dependency| handle.add_dependency(dependency.dependency_handle()))
            .count()
    }
}

/// Implement `DependencyList` for reference tuples of a given arity.
///
/// Rust lacks variadic generics, so each tuple size needs its own
/// implementation. Eight elements cover the realistic fan-in range; wider
/// joins can pass a slice.
macro_rules! impl_dependency_list {
    ($($D:ident),+) => {
        impl<$($D: Dependency),+> DependencyList for ($(&$D,)+) {
            #[allow(non_snake_case)]
            fn register(&self, handle: &Arc<Handle>) -> usize {
                let ($($D,)+) = self;
                let mut registered = 0;
                $(
                    if handle.add_dependency($D.dependency_handle()) {
                        registered += 1;
                    }
                )+
                registered
            }
        }
    };
}

impl_dependency_list!(A);
impl_dependency_list!(A, B);
impl_dependency_list!(A, B, C);
impl_dependency_list!(A, B, C, D);
impl_dependency_list!(A, B, C, D, E);
impl_dependency_list!(A, B, C, D, E, F);
impl_dependency_list!(A, B, C, D, E, F, G);
impl_dependency_list!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests;
