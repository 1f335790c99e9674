// ============================================================================
// spark-effects - Count Up
// Frame-driven number animation from 0 to a target
// ============================================================================

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::cloned;
use crate::config::CountUpOptions;
use crate::easing::{ease_out_cubic, round_half_up};
use crate::host::{FrameHandle, Host};
use crate::primitives::effect::{CleanupFn, Effect, effect_with_cleanup};
use crate::primitives::signal::{ReadSignal, Signal, signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountUpPhase {
    /// Not started, or the start flag went false
    #[default]
    Idle,
    Animating,
    /// Holding the target
    Done,
}

/// Displayed value `elapsed_ms` after the start flag went true, and whether
/// the animation has finished.
pub fn count_at(elapsed_ms: f64, options: &CountUpOptions) -> (i64, bool) {
    let progress = if options.duration_ms == 0 {
        1.0
    } else {
        (elapsed_ms.max(0.0) / f64::from(options.duration_ms)).min(1.0)
    };
    let value = round_half_up(ease_out_cubic(progress) * options.target as f64) as i64;
    (value, progress >= 1.0)
}

/// Handle returned by [`use_count_up`].
#[derive(Clone, Debug)]
pub struct CountUp {
    value: Signal<i64>,
    phase: Signal<CountUpPhase>,
    effect: Effect,
}

impl CountUp {
    pub fn value(&self) -> ReadSignal<i64> {
        self.value.read_only()
    }

    pub fn phase(&self) -> ReadSignal<CountUpPhase> {
        self.phase.read_only()
    }

    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

/// One animation, from the start flag going true until it finishes or is
/// torn down.
struct CountUpRun<H: ?Sized> {
    host: Weak<H>,
    options: CountUpOptions,
    value: Signal<i64>,
    phase: Signal<CountUpPhase>,
    /// Host clock when the start flag went true
    started_at: f64,
    pending: Cell<Option<FrameHandle>>,
    alive: Cell<bool>,
}

impl<H: Host + ?Sized + 'static> CountUpRun<H> {
    fn schedule(self: &Rc<Self>) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let run = Rc::clone(self);
        let handle = host.request_animation_frame(Box::new(move |timestamp| run.step(timestamp)));
        self.pending.set(Some(handle));
    }

    fn step(self: &Rc<Self>, timestamp: f64) {
        self.pending.set(None);
        if !self.alive.get() {
            return;
        }
        let (value, done) = count_at(timestamp - self.started_at, &self.options);
        self.value.set(value);
        if done {
            tracing::debug!(target_value = self.options.target, "count up finished");
            self.phase.set(CountUpPhase::Done);
        } else {
            self.schedule();
        }
    }

    fn cancel(&self) {
        self.alive.set(false);
        if let (Some(host), Some(handle)) = (self.host.upgrade(), self.pending.take()) {
            host.cancel_animation_frame(handle);
        }
    }
}

/// Animate a number from 0 to `options.target` once `start` is true.
///
/// Value follows `round(ease_out_cubic(elapsed / duration) * target)`,
/// sampled once per frame, with `elapsed` measured on the host clock from
/// the moment `start` went true. `start` going false at any point cancels the
/// animation and resets to 0 / `Idle`; going true again restarts from 0.
pub fn use_count_up<H>(
    host: &Rc<H>,
    options: CountUpOptions,
    start: impl Into<ReadSignal<bool>>,
) -> CountUp
where
    H: Host + ?Sized + 'static,
{
    let start = start.into();
    let value = signal(0_i64);
    let phase = signal(CountUpPhase::Idle);
    let weak_host = Rc::downgrade(host);

    let effect = effect_with_cleanup(cloned!(value, phase => move || {
        if !start.get() {
            phase.set(CountUpPhase::Idle);
            value.set(0);
            return None;
        }

        let host = weak_host.upgrade()?;
        let run = Rc::new(CountUpRun {
            host: weak_host.clone(),
            options,
            value: value.clone(),
            phase: phase.clone(),
            started_at: host.now(),
            pending: Cell::new(None),
            alive: Cell::new(true),
        });
        phase.set(CountUpPhase::Animating);
        run.schedule();
        tracing::debug!(
            target_value = options.target,
            duration_ms = options.duration_ms,
            "count up started"
        );

        let teardown: CleanupFn = Box::new(move || run.cancel());
        Some(teardown)
    }));

    CountUp {
        value,
        phase,
        effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::VirtualHost;

    #[test]
    fn curve_samples() {
        let opts = CountUpOptions::new(100).with_duration_ms(1000);
        assert_eq!(count_at(0.0, &opts), (0, false));
        assert_eq!(count_at(500.0, &opts), (88, false));
        assert_eq!(count_at(1000.0, &opts), (100, true));
        assert_eq!(count_at(5000.0, &opts), (100, true));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let opts = CountUpOptions::new(42).with_duration_ms(0);
        assert_eq!(count_at(0.0, &opts), (42, true));
    }

    #[test]
    fn negative_target_counts_down() {
        let opts = CountUpOptions::new(-10).with_duration_ms(100);
        assert_eq!(count_at(100.0, &opts), (-10, true));
    }

    #[test]
    fn idle_until_started() {
        let host = Rc::new(VirtualHost::new());
        let start = signal(false);
        let counter = use_count_up(&host, CountUpOptions::new(10), &start);
        host.frames(5);
        assert_eq!(counter.phase().get_untracked(), CountUpPhase::Idle);
        assert_eq!(host.pending_frames(), 0);

        start.set(true);
        assert_eq!(counter.phase().get_untracked(), CountUpPhase::Animating);
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn dispose_cancels_frame() {
        let host = Rc::new(VirtualHost::new());
        let start = signal(true);
        let counter = use_count_up(&host, CountUpOptions::new(10), &start);
        host.frames(2);
        counter.dispose();
        assert_eq!(host.pending_frames(), 0);
    }
}
