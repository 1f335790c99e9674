// ============================================================================
// spark-effects - Effect System
// Side effects that re-run when dependencies change
// ============================================================================
//
// An effect runs its function immediately, records every signal it reads,
// and runs again whenever one of those signals is written. The function may
// return a teardown closure; the teardown runs before the next execution and
// when the effect is disposed. This is the acquisition/release pairing every
// tracker builds on: listeners, frames and timers are acquired in the effect
// body and released in its teardown.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::constants::*;
use crate::core::context::with_context;
use crate::core::types::{AnyReaction, AnySource};
use crate::primitives::scope::register_effect_with_scope;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Teardown returned by an effect run
pub type CleanupFn = Box<dyn FnOnce()>;

/// Effect function signature - returns optional teardown
pub type EffectFn = Box<dyn FnMut() -> Option<CleanupFn>>;

// =============================================================================
// EFFECT INNER
// =============================================================================

pub struct EffectInner {
    /// Status flags (CLEAN/DIRTY/RUNNING/DESTROYED)
    flags: Cell<u32>,

    /// The effect function (taken out while running)
    func: RefCell<Option<EffectFn>>,

    /// Sources read during the last run
    deps: RefCell<Vec<Rc<dyn AnySource>>>,

    /// Teardown from the last run
    teardown: RefCell<Option<CleanupFn>>,

    self_weak: Weak<EffectInner>,
}

impl EffectInner {
    fn new(func: EffectFn) -> Rc<Self> {
        Rc::new_cyclic(|self_weak| Self {
            flags: Cell::new(DIRTY),
            func: RefCell::new(Some(func)),
            deps: RefCell::new(Vec::new()),
            teardown: RefCell::new(None),
            self_weak: self_weak.clone(),
        })
    }

    fn has_flag(&self, flag: u32) -> bool {
        self.flags.get() & flag != 0
    }

    fn set_flag(&self, flag: u32) {
        self.flags.set(self.flags.get() | flag);
    }

    fn clear_flag(&self, flag: u32) {
        self.flags.set(self.flags.get() & !flag);
    }

    fn as_weak_reaction(&self) -> Weak<dyn AnyReaction> {
        self.self_weak.clone()
    }

    /// Unsubscribe from every source read during the last run
    fn remove_deps(&self) {
        let addr = self as *const Self as *const ();
        let deps: Vec<_> = self.deps.borrow_mut().drain(..).collect();
        for dep in deps {
            dep.remove_reaction(addr);
        }
    }

    pub fn dep_count(&self) -> usize {
        self.deps.borrow().len()
    }
}

impl Drop for EffectInner {
    fn drop(&mut self) {
        // Fallback for effects that were never disposed explicitly
        if let Some(cleanup) = self.teardown.get_mut().take() {
            cleanup();
        }
    }
}

impl AnyReaction for EffectInner {
    fn add_dep(&self, source: Rc<dyn AnySource>) {
        self.deps.borrow_mut().push(source);
    }

    fn notify(&self) {
        if self.has_flag(DESTROYED) {
            return;
        }
        if self.has_flag(RUNNING) {
            // Picked up by the run loop once the current pass finishes
            self.set_flag(DIRTY);
            return;
        }
        self.set_flag(DIRTY);
        if let Some(rc_self) = self.self_weak.upgrade() {
            update_effect(&rc_self);
        }
    }

    fn is_destroyed(&self) -> bool {
        self.has_flag(DESTROYED)
    }
}

// =============================================================================
// EFFECT HANDLE
// =============================================================================

/// Handle to a running effect.
///
/// Dropping the last handle of an effect that no scope owns disposes it.
/// Effects created inside an [`EffectScope`](crate::EffectScope) live until
/// the scope stops.
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub fn is_destroyed(&self) -> bool {
        self.inner.has_flag(DESTROYED)
    }

    /// Dispose the effect, running its teardown. Idempotent.
    pub fn dispose(&self) {
        destroy_effect(&self.inner);
    }

    /// Number of sources the last run read.
    pub fn dep_count(&self) -> usize {
        self.inner.dep_count()
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if Rc::strong_count(&self.inner) == 1 {
            self.dispose();
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("destroyed", &self.is_destroyed())
            .field("deps", &self.dep_count())
            .finish()
    }
}

// =============================================================================
// RUN / DESTROY
// =============================================================================

fn execute_teardown(effect: &EffectInner) {
    let teardown = effect.teardown.borrow_mut().take();
    if let Some(cleanup) = teardown {
        cleanup();
    }
}

/// Dispose an effect: unsubscribe, mark destroyed, run teardown.
pub fn destroy_effect(effect: &Rc<EffectInner>) {
    if effect.has_flag(DESTROYED) {
        return;
    }
    effect.set_flag(DESTROYED);
    effect.remove_deps();
    execute_teardown(effect);

    // A running effect still owns its function; update_effect drops it
    if !effect.has_flag(RUNNING) {
        *effect.func.borrow_mut() = None;
    }
}

/// Run an effect until it settles.
///
/// Each pass unsubscribes from the previous run's sources, runs the previous
/// teardown, then calls the function with this effect as the active reaction
/// so its reads subscribe it again.
pub fn update_effect(effect: &Rc<EffectInner>) {
    let mut passes = 0u32;

    loop {
        if effect.has_flag(DESTROYED) {
            return;
        }
        effect.clear_flag(DIRTY | CLEAN);
        effect.set_flag(RUNNING);

        effect.remove_deps();
        execute_teardown(effect);

        let func = effect.func.borrow_mut().take();
        let teardown = match func {
            Some(mut func) => {
                // A write inside `untrack` can re-run this effect synchronously;
                // its own reads must still subscribe.
                let (prev, prev_untracking) = with_context(|ctx| {
                    (
                        ctx.set_active_reaction(Some(effect.as_weak_reaction())),
                        ctx.set_untracking(false),
                    )
                });
                let teardown = func();
                with_context(|ctx| {
                    ctx.set_active_reaction(prev);
                    ctx.set_untracking(prev_untracking);
                });

                if !effect.has_flag(DESTROYED) {
                    *effect.func.borrow_mut() = Some(func);
                }
                teardown
            }
            None => None,
        };

        effect.clear_flag(RUNNING);

        if effect.has_flag(DESTROYED) {
            // Disposed from inside its own run
            effect.remove_deps();
            if let Some(cleanup) = teardown {
                cleanup();
            }
            return;
        }

        *effect.teardown.borrow_mut() = teardown;

        if !effect.has_flag(DIRTY) {
            effect.set_flag(CLEAN);
            return;
        }

        passes += 1;
        if passes >= MAX_EFFECT_RERUNS {
            effect.clear_flag(DIRTY);
            effect.set_flag(CLEAN);
            tracing::error!(
                passes,
                "effect keeps invalidating itself; giving up until its next dependency change"
            );
            return;
        }
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Create an effect whose function returns an optional teardown.
///
/// The function runs immediately. The teardown runs before each re-run and
/// once on disposal.
///
/// # Example
///
/// ```
/// use spark_effects::{effect_with_cleanup, signal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let enabled = signal(true);
/// let attached = Rc::new(Cell::new(0));
///
/// let e = effect_with_cleanup({
///     let (enabled, attached) = (enabled.clone(), attached.clone());
///     move || {
///         if !enabled.get() {
///             return None;
///         }
///         attached.set(attached.get() + 1);
///         let attached = attached.clone();
///         Some(Box::new(move || attached.set(attached.get() - 1)))
///     }
/// });
///
/// assert_eq!(attached.get(), 1);
/// enabled.set(false);
/// assert_eq!(attached.get(), 0);
/// enabled.set(true);
/// e.dispose();
/// assert_eq!(attached.get(), 0);
/// ```
pub fn effect_with_cleanup<F>(f: F) -> Effect
where
    F: FnMut() -> Option<CleanupFn> + 'static,
{
    let inner = EffectInner::new(Box::new(f));
    register_effect_with_scope(&inner);
    update_effect(&inner);
    Effect { inner }
}

/// Create an effect without teardown.
pub fn effect<F>(mut f: F) -> Effect
where
    F: FnMut() + 'static,
{
    effect_with_cleanup(move || {
        f();
        None
    })
}

/// Whether code is currently running inside an effect.
pub fn effect_tracking() -> bool {
    with_context(|ctx| ctx.has_active_reaction())
}
