//! Unwrapping hooks for container types.
//!
//! Hosts often hand the engine an envelope (a page of results, an API
//! response) rather than the records themselves. An unwrapper registered for
//! the envelope type returns the slot that actually needs translating; the
//! engine applies it when an entry is passed as [`Entry::wrapped`](crate::Entry::wrapped).

use std::any::Any;
use std::marker::PhantomData;

use crate::record::Slot;

/// Type-erased unwrapper, looked up by the wrapper's `TypeId`.
pub(crate) trait Unwrapper: Send + Sync {
    fn unwrap<'a>(&self, value: &'a mut dyn Any) -> Option<Slot<'a>>;
}

pub(crate) struct FnUnwrapper<T, F> {
    f: F,
    _wrapper: PhantomData<fn(&mut T)>,
}

impl<T, F> FnUnwrapper<T, F>
where
    T: Any,
    F: for<'a> Fn(&'a mut T) -> Slot<'a> + Send + Sync,
{
    pub(crate) fn new(f: F) -> Self {
        FnUnwrapper { f, _wrapper: PhantomData }
    }
}

impl<T, F> Unwrapper for FnUnwrapper<T, F>
where
    T: Any,
    F: for<'a> Fn(&'a mut T) -> Slot<'a> + Send + Sync,
{
    fn unwrap<'a>(&self, value: &'a mut dyn Any) -> Option<Slot<'a>> {
        value.downcast_mut::<T>().map(|wrapper| (self.f)(wrapper))
    }
}
