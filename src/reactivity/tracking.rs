// ============================================================================
// spark-effects - Dependency Tracking
// Read registration, write notification, and untracked reads
// ============================================================================

use std::rc::Rc;

use crate::core::context::with_context;
use crate::core::types::{AnySource, SourceInner};

// =============================================================================
// TRACK READ
// =============================================================================

/// Register `source` as a dependency of the running reaction, if any.
pub fn track_read<T: 'static>(source: &Rc<SourceInner<T>>) {
    let active = with_context(|ctx| {
        if ctx.is_untracking() {
            None
        } else {
            ctx.active_reaction()
        }
    });

    let Some(weak) = active else {
        return;
    };
    let Some(reaction) = weak.upgrade() else {
        return;
    };

    if source.add_reaction(weak) {
        reaction.add_dep(source.clone() as Rc<dyn AnySource>);
    }
}

// =============================================================================
// NOTIFY WRITE
// =============================================================================

/// Notify every live reaction subscribed to `source`.
///
/// The subscriber list is snapshotted first so reactions may subscribe or
/// unsubscribe while being notified.
pub fn notify_write<T: 'static>(source: &Rc<SourceInner<T>>) {
    for reaction in source.live_reactions() {
        reaction.notify();
    }
}

// =============================================================================
// UNTRACK
// =============================================================================

/// Run `f` without registering any reads as dependencies.
///
/// # Example
///
/// ```
/// use spark_effects::{effect, signal, untrack};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let a = signal(1);
/// let runs = Rc::new(Cell::new(0));
///
/// let _e = effect({
///     let (a, runs) = (a.clone(), runs.clone());
///     move || {
///         untrack(|| a.get());
///         runs.set(runs.get() + 1);
///     }
/// });
///
/// a.set(2);
/// assert_eq!(runs.get(), 1);
/// ```
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let prev = with_context(|ctx| ctx.set_untracking(true));

    struct Restore(bool);

    impl Drop for Restore {
        fn drop(&mut self) {
            with_context(|ctx| ctx.set_untracking(self.0));
        }
    }

    let _restore = Restore(prev);
    f()
}
