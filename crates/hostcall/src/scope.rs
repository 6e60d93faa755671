//! Scoped ownership of intermediate interpreter objects.
//!
//! CPython tracks object lifetimes with manual reference counts. Inside the
//! adapter every intermediate object (such as the UTF-8 `bytes` produced while
//! decoding an argument) is acquired into a [`Scoped`] guard at one program
//! point, and its reference is released by `Drop` on every exit path, early
//! returns included. Nothing calls `Py_DecRef` by hand.
//!
//! Each thread keeps a count of guards currently alive. It is pure
//! instrumentation: tests and benchmarks read it with [`live_intermediates`]
//! to check that a call left nothing behind.

use std::cell::Cell;
use std::ops::Deref;

use pyo3::prelude::*;

thread_local! {
    static LIVE: Cell<usize> = const { Cell::new(0) };
}

/// Number of [`Scoped`] guards alive on the current thread.
pub fn live_intermediates() -> usize {
    LIVE.with(Cell::get)
}

/// An owned reference to an intermediate object, released when dropped.
///
/// The guard derefs to the underlying [`Bound`], so callers use it like the
/// object itself. It cannot be cloned or moved out of.
pub struct Scoped<'py, T> {
    inner: Bound<'py, T>,
    label: &'static str,
}

impl<'py, T> Scoped<'py, T> {
    /// Take ownership of `inner` for the rest of the enclosing scope.
    ///
    /// `label` names the object in trace output.
    pub fn acquire(inner: Bound<'py, T>, label: &'static str) -> Self {
        let live = LIVE.with(|live| {
            let n = live.get() + 1;
            live.set(n);
            n
        });
        tracing::trace!(intermediate = label, live, "acquired");
        Self { inner, label }
    }
}

impl<'py, T> Deref for Scoped<'py, T> {
    type Target = Bound<'py, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Drop for Scoped<'_, T> {
    fn drop(&mut self) {
        let live = LIVE.with(|live| {
            let n = live.get().saturating_sub(1);
            live.set(n);
            n
        });
        tracing::trace!(intermediate = self.label, live, "released");
    }
}

impl<T> std::fmt::Debug for Scoped<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoped")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
