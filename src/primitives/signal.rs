// ============================================================================
// spark-effects - Signal Primitive
// Writable reactive values and their read-only views
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::types::{AnySource, EqualsFn, SourceInner};
use crate::reactivity::tracking::{notify_write, track_read};

// =============================================================================
// SIGNAL<T>
// =============================================================================

/// A reactive value.
///
/// Reading with [`Signal::get`] inside an effect subscribes that effect;
/// writing with [`Signal::set`] re-runs subscribed effects synchronously.
///
/// # Example
///
/// ```
/// use spark_effects::signal;
///
/// let count = signal(0);
/// assert_eq!(count.get(), 0);
///
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Signal<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self {
            inner: Rc::new(SourceInner::new(value)),
        }
    }

    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            inner: Rc::new(SourceInner::new_with_equals(value, equals)),
        }
    }

    /// Current value (cloned). Tracked.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        track_read(&self.inner);
        self.inner.get()
    }

    /// Current value without registering a dependency.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.inner.get()
    }

    /// Borrow the current value. Tracked.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track_read(&self.inner);
        self.inner.with(f)
    }

    /// Write a new value. Returns true if it differed from the old one;
    /// equal writes notify nobody.
    pub fn set(&self, value: T) -> bool {
        let changed = self.inner.set(value);
        if changed {
            notify_write(&self.inner);
        }
        changed
    }

    /// Mutate in place and notify.
    ///
    /// ```
    /// use spark_effects::signal;
    /// use std::collections::BTreeSet;
    ///
    /// let seen = signal(BTreeSet::new());
    /// seen.update(|s| {
    ///     s.insert(3usize);
    /// });
    /// assert!(seen.with(|s| s.contains(&3)));
    /// ```
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.inner.update(f);
        notify_write(&self.inner);
    }

    /// A view of this signal that cannot be written.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: self.clone(),
        }
    }

    /// Number of effects currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.inner.reaction_count()
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner
            .with(|value| f.debug_struct("Signal").field("value", value).finish())
    }
}

/// Create a new reactive signal.
pub fn signal<T>(value: T) -> Signal<T>
where
    T: PartialEq + 'static,
{
    Signal::new(value)
}

/// Create a signal with a custom equality function.
pub fn signal_with_equals<T: 'static>(value: T, equals: EqualsFn<T>) -> Signal<T> {
    Signal::new_with_equals(value, equals)
}

// =============================================================================
// READ SIGNAL<T>
// =============================================================================

/// Read-only handle to a [`Signal`]. Trackers hand these out for their
/// outputs so callers can render them but not overwrite them.
pub struct ReadSignal<T> {
    inner: Signal<T>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.get()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.inner.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }
}

impl<T> From<Signal<T>> for ReadSignal<T> {
    fn from(inner: Signal<T>) -> Self {
        Self { inner }
    }
}

impl<T> From<&Signal<T>> for ReadSignal<T> {
    fn from(signal: &Signal<T>) -> Self {
        Self {
            inner: signal.clone(),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
