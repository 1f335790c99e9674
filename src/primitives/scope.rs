// ============================================================================
// spark-effects - Effect Scope
//
// Group effects for batch disposal. A scope is a mount lifetime: hooks
// called inside `scope.run(..)` register their effects with it, and
// `scope.stop()` is the unmount that tears all of them down.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::primitives::effect::{EffectInner, destroy_effect};

// =============================================================================
// THREAD-LOCAL SCOPE STATE
// =============================================================================

thread_local! {
    static ACTIVE_SCOPE: RefCell<Option<Rc<EffectScopeInner>>> = const { RefCell::new(None) };
}

fn get_active_scope() -> Option<Rc<EffectScopeInner>> {
    ACTIVE_SCOPE.with(|s| s.borrow().clone())
}

fn set_active_scope(scope: Option<Rc<EffectScopeInner>>) -> Option<Rc<EffectScopeInner>> {
    ACTIVE_SCOPE.with(|s| s.replace(scope))
}

/// Cleanup registered with [`on_scope_dispose`]
pub type ScopeCleanupFn = Box<dyn FnOnce()>;

// =============================================================================
// EFFECT SCOPE INNER
// =============================================================================

pub struct EffectScopeInner {
    active: Cell<bool>,
    effects: RefCell<Vec<Rc<EffectInner>>>,
    cleanups: RefCell<Vec<ScopeCleanupFn>>,
    parent: RefCell<Option<Weak<EffectScopeInner>>>,
    scopes: RefCell<Vec<Rc<EffectScopeInner>>>,
    self_weak: Weak<EffectScopeInner>,
}

impl EffectScopeInner {
    fn new(detached: bool) -> Rc<Self> {
        let parent = if detached { None } else { get_active_scope() };

        let scope = Rc::new_cyclic(|self_weak| Self {
            active: Cell::new(true),
            effects: RefCell::new(Vec::new()),
            cleanups: RefCell::new(Vec::new()),
            parent: RefCell::new(parent.as_ref().map(Rc::downgrade)),
            scopes: RefCell::new(Vec::new()),
            self_weak: self_weak.clone(),
        });

        if let Some(parent_scope) = parent {
            parent_scope.scopes.borrow_mut().push(scope.clone());
        }

        scope
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        if !self.active.get() {
            return None;
        }
        let self_rc = self.self_weak.upgrade()?;

        let prev_scope = set_active_scope(Some(self_rc));
        let result = f();
        set_active_scope(prev_scope);

        Some(result)
    }

    pub fn stop(&self) {
        if !self.active.replace(false) {
            return;
        }

        let effects: Vec<_> = self.effects.borrow_mut().drain(..).collect();
        for effect in effects.iter().rev() {
            destroy_effect(effect);
        }

        // Cleanup panics must not prevent the rest of the unmount
        let cleanups: Vec<_> = self.cleanups.borrow_mut().drain(..).collect();
        for cleanup in cleanups.into_iter().rev() {
            if std::panic::catch_unwind(std::panic::AssertUnwindSafe(cleanup)).is_err() {
                tracing::warn!("scope cleanup panicked during stop");
            }
        }

        let child_scopes: Vec<_> = self.scopes.borrow_mut().drain(..).collect();
        for child in child_scopes {
            child.stop();
        }

        let parent = self.parent.borrow_mut().take();
        if let Some(parent) = parent.and_then(|w| w.upgrade()) {
            let me = self as *const Self;
            parent.scopes.borrow_mut().retain(|s| !std::ptr::eq(Rc::as_ptr(s), me));
        }
    }

    pub fn add_effect(&self, effect: Rc<EffectInner>) {
        self.effects.borrow_mut().push(effect);
    }

    pub fn add_cleanup(&self, cleanup: ScopeCleanupFn) {
        self.cleanups.borrow_mut().push(cleanup);
    }
}

impl Drop for EffectScopeInner {
    fn drop(&mut self) {
        if self.active.get() {
            self.stop();
        }
    }
}

// =============================================================================
// EFFECT SCOPE
// =============================================================================

/// A mount scope that owns effects and cleanups.
///
/// # Example
///
/// ```
/// use spark_effects::{effect, effect_scope, signal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let count = signal(0);
/// let runs = Rc::new(Cell::new(0));
///
/// let scope = effect_scope(false);
/// scope.run(|| {
///     let (count, runs) = (count.clone(), runs.clone());
///     effect(move || {
///         count.get();
///         runs.set(runs.get() + 1);
///     });
/// });
///
/// count.set(1);
/// assert_eq!(runs.get(), 2);
///
/// scope.stop();
/// count.set(2);
/// assert_eq!(runs.get(), 2);
/// ```
#[derive(Clone)]
pub struct EffectScope {
    inner: Rc<EffectScopeInner>,
}

impl EffectScope {
    pub fn active(&self) -> bool {
        self.inner.is_active()
    }

    /// Run `f` with this scope active. Returns None once stopped.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.inner.run(f)
    }

    /// Dispose all effects (in reverse creation order), run cleanups, stop
    /// child scopes. Idempotent.
    pub fn stop(&self) {
        self.inner.stop();
    }
}

impl std::fmt::Debug for EffectScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectScope")
            .field("active", &self.active())
            .field("effects", &self.inner.effects.borrow().len())
            .finish()
    }
}

/// Create a scope. Unless `detached`, it becomes a child of the currently
/// running scope and stops with it.
pub fn effect_scope(detached: bool) -> EffectScope {
    EffectScope {
        inner: EffectScopeInner::new(detached),
    }
}

/// The scope currently running, if any.
pub fn get_current_scope() -> Option<EffectScope> {
    get_active_scope().map(|inner| EffectScope { inner })
}

/// Register a cleanup on the current scope. Outside a scope this is a no-op
/// (with a debug log), matching how an unowned hook simply has no unmount.
pub fn on_scope_dispose(cleanup: impl FnOnce() + 'static) {
    match get_active_scope() {
        Some(scope) => scope.add_cleanup(Box::new(cleanup)),
        None => tracing::debug!("on_scope_dispose called outside of a scope"),
    }
}

/// Attach a new effect to the current scope, if any.
pub(crate) fn register_effect_with_scope(effect: &Rc<EffectInner>) {
    if let Some(scope) = get_active_scope() {
        scope.add_effect(effect.clone());
    }
}
