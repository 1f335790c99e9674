// ============================================================================
// spark-effects - Reactive Context
// Thread-local state for tracking the currently running reaction
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use super::types::AnyReaction;

// =============================================================================
// REACTIVE CONTEXT
// =============================================================================

/// Thread-local reactive state.
///
/// Trackers are single-threaded: every signal, effect and host callback
/// lives on the UI thread, so one context per thread is all the graph needs.
pub struct ReactiveContext {
    /// Reaction currently executing (reads inside it become dependencies)
    active_reaction: RefCell<Option<Weak<dyn AnyReaction>>>,

    /// Whether reads are currently untracked
    untracking: Cell<bool>,
}

impl ReactiveContext {
    pub fn new() -> Self {
        Self {
            active_reaction: RefCell::new(None),
            untracking: Cell::new(false),
        }
    }

    /// Set the active reaction, returning the previous one
    pub fn set_active_reaction(
        &self,
        reaction: Option<Weak<dyn AnyReaction>>,
    ) -> Option<Weak<dyn AnyReaction>> {
        self.active_reaction.replace(reaction)
    }

    pub fn active_reaction(&self) -> Option<Weak<dyn AnyReaction>> {
        self.active_reaction.borrow().clone()
    }

    pub fn has_active_reaction(&self) -> bool {
        self.active_reaction.borrow().is_some()
    }

    /// Set untracking mode, returning the previous value
    pub fn set_untracking(&self, value: bool) -> bool {
        self.untracking.replace(value)
    }

    pub fn is_untracking(&self) -> bool {
        self.untracking.get()
    }
}

impl Default for ReactiveContext {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CONTEXT: ReactiveContext = ReactiveContext::new();
}

/// Run `f` with the thread's reactive context.
pub fn with_context<R>(f: impl FnOnce(&ReactiveContext) -> R) -> R {
    CONTEXT.with(f)
}

/// True when a read right now would register a dependency.
pub fn is_tracking() -> bool {
    with_context(|ctx| ctx.has_active_reaction() && !ctx.is_untracking())
}
