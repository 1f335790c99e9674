// ============================================================================
// spark-effects - Type Definitions
// Type-erased traits and the signal storage cell
// ============================================================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

// =============================================================================
// TYPE-ERASED TRAITS
// =============================================================================
//
// Graph bookkeeping (who depends on whom) never needs the value type, so
// effects store their dependencies as Rc<dyn AnySource> and sources store
// their dependents as Weak<dyn AnyReaction>.
// =============================================================================

/// Equality function used to decide whether a write is a change.
pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// Default equality using PartialEq.
pub fn default_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Type-erased source interface (implemented by `SourceInner<T>`).
pub trait AnySource: Any {
    /// Number of live reactions subscribed to this source
    fn reaction_count(&self) -> usize;

    /// Unsubscribe a reaction, identified by address
    fn remove_reaction(&self, reaction: *const ());
}

/// Type-erased reaction interface (implemented by `EffectInner`).
pub trait AnyReaction: Any {
    /// Record a source read during the current run
    fn add_dep(&self, source: Rc<dyn AnySource>);

    /// A dependency was written
    fn notify(&self);

    /// Whether the reaction has been disposed
    fn is_destroyed(&self) -> bool;
}

/// Address of a reaction, used as its identity in subscriber lists.
pub(crate) fn reaction_addr(reaction: &Weak<dyn AnyReaction>) -> *const () {
    Weak::as_ptr(reaction) as *const ()
}

// =============================================================================
// SOURCE INNER
// =============================================================================

/// Storage behind a `Signal<T>`: the value, its equality and its subscribers.
pub struct SourceInner<T> {
    value: RefCell<T>,
    equals: EqualsFn<T>,
    reactions: RefCell<Vec<Weak<dyn AnyReaction>>>,
}

impl<T> SourceInner<T> {
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::new_with_equals(value, default_equals)
    }

    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            value: RefCell::new(value),
            equals,
            reactions: RefCell::new(Vec::new()),
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.borrow())
    }

    /// Replace the value. Returns false when the new value equals the old.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.borrow_mut();
        if (self.equals)(&*current, &value) {
            return false;
        }
        *current = value;
        true
    }

    /// Mutate in place. Always counts as a change.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut *self.value.borrow_mut());
    }

    /// Subscribe a reaction. Returns false if it was already subscribed.
    pub fn add_reaction(&self, reaction: Weak<dyn AnyReaction>) -> bool {
        let addr = reaction_addr(&reaction);
        let mut reactions = self.reactions.borrow_mut();
        if reactions.iter().any(|r| reaction_addr(r) == addr) {
            return false;
        }
        reactions.push(reaction);
        true
    }

    /// Snapshot of live reactions, pruning dropped or destroyed ones.
    pub fn live_reactions(&self) -> Vec<Rc<dyn AnyReaction>> {
        let mut reactions = self.reactions.borrow_mut();
        reactions.retain(|r| r.upgrade().is_some_and(|r| !r.is_destroyed()));
        reactions.iter().filter_map(Weak::upgrade).collect()
    }
}

impl<T: 'static> AnySource for SourceInner<T> {
    fn reaction_count(&self) -> usize {
        self.reactions
            .borrow()
            .iter()
            .filter(|r| r.strong_count() > 0)
            .count()
    }

    fn remove_reaction(&self, reaction: *const ()) {
        self.reactions
            .borrow_mut()
            .retain(|r| reaction_addr(r) != reaction);
    }
}
