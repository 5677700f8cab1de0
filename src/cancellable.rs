//! Cooperative cancellation for long-running loads and renders.
//!
//! A `Cancellable` does not interrupt anything by itself; it is a flag that the caller can
//! set from another thread (or from a signal handler, etc.) while a load or a render is in
//! progress.  We poll it ourselves at well-defined points: before each I/O round-trip in
//! [`crate::io`], and at the start of each filter primitive in [`crate::filters`].  This keeps
//! cancellation points predictable, instead of risking leaving internal state half-built if we
//! could be interrupted anywhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gio::prelude::*;

/// A cheaply-clonable, thread-shareable cancellation flag.
#[derive(Clone, Default)]
pub struct Cancellable(Arc<AtomicBool>);

/// Indicates that an operation was stopped because its `Cancellable` was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl Cancellable {
    pub fn new() -> Cancellable {
        Cancellable(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation.  Safe to call from any thread at any time.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns `Err(Cancelled)` if cancellation has been requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Builds a `Cancellable` that mirrors a `gio::Cancellable` from the public API.
    ///
    /// `crate::io` and `crate::filters` only know about our own `Cancellable`, so the
    /// `gio::Cancellable` that callers pass to [`crate::api::CairoRenderer`] gets bridged to
    /// one of these at the start of rendering.  We connect to the `cancelled` signal once,
    /// rather than polling the `gio::Cancellable` on every check, to keep the hot path a
    /// plain atomic load.
    pub fn from_gio(gio_cancellable: Option<&gio::Cancellable>) -> Cancellable {
        let cancellable = Cancellable::new();

        if let Some(g) = gio_cancellable {
            if g.is_cancelled() {
                cancellable.cancel();
            } else {
                let target = cancellable.clone();
                let _ = g.connect_cancelled(move |_| target.cancel());
            }
        }

        cancellable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let c = Cancellable::new();
        assert!(c.check().is_ok());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let c = Cancellable::new();
        let clone = c.clone();
        clone.cancel();
        assert_eq!(c.check(), Err(Cancelled));
    }
}
