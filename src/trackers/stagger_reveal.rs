// ============================================================================
// spark-effects - Stagger Reveal
// Reveal list items one after another once a trigger fires
// ============================================================================

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::cloned;
use crate::config::StaggerOptions;
use crate::host::{Host, TimerHandle};
use crate::primitives::effect::{CleanupFn, Effect, effect_with_cleanup};
use crate::primitives::signal::{ReadSignal, Signal, signal};

/// Handle returned by [`use_stagger_reveal`].
#[derive(Clone, Debug)]
pub struct StaggerReveal {
    revealed: Signal<BTreeSet<usize>>,
    effect: Effect,
}

impl StaggerReveal {
    pub fn revealed(&self) -> ReadSignal<BTreeSet<usize>> {
        self.revealed.read_only()
    }

    /// Whether item `index` is revealed. Tracked.
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.with(|set| set.contains(&index))
    }

    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

/// Reveal `options.count` items, item `i` at `i * stagger_delay_ms` after
/// `trigger` becomes true.
///
/// `trigger` going false empties the set and clears every timer still
/// pending; going true again starts the sequence over.
pub fn use_stagger_reveal<H>(
    host: &Rc<H>,
    options: StaggerOptions,
    trigger: impl Into<ReadSignal<bool>>,
) -> StaggerReveal
where
    H: Host + ?Sized + 'static,
{
    let trigger = trigger.into();
    let revealed = signal(BTreeSet::new());
    let weak_host = Rc::downgrade(host);

    let effect = effect_with_cleanup(cloned!(revealed => move || {
        if !trigger.get() {
            revealed.set(BTreeSet::new());
            return None;
        }
        let host = weak_host.upgrade()?;

        let alive = Rc::new(Cell::new(true));
        let timers: Vec<TimerHandle> = (0..options.count)
            .map(|index| {
                let reveal = cloned!(alive, revealed => move || {
                    if alive.get() {
                        tracing::trace!(index, "stagger item revealed");
                        revealed.update(|set| {
                            set.insert(index);
                        });
                    }
                });
                host.set_timeout(Box::new(reveal), options.delay_for(index))
            })
            .collect();
        tracing::debug!(count = options.count, delay_ms = options.stagger_delay_ms, "stagger started");

        let teardown: CleanupFn = Box::new(cloned!(weak_host => move || {
            alive.set(false);
            if let Some(host) = weak_host.upgrade() {
                for timer in timers {
                    host.clear_timeout(timer);
                }
            }
        }));
        Some(teardown)
    }));

    StaggerReveal { revealed, effect }
}
