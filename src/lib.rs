// ============================================================================
// spark-effects - Reactive UI Effect Trackers
// ============================================================================
//
// Scroll reveal, pointer glow, tilt, count-up, staggered reveal and magnetic
// hover, built on a small signal/effect core and driven through a `Host`
// capability trait. `VirtualHost` drives them headlessly on a virtual clock.
// ============================================================================

pub mod config;
pub mod core;
pub mod easing;
pub mod error;
pub mod host;
mod macros;
pub mod primitives;
pub mod reactivity;
pub mod style;
pub mod trackers;

// Reactive core
pub use core::constants;
pub use core::context::{ReactiveContext, is_tracking, with_context};
pub use core::types::{AnyReaction, AnySource, EqualsFn, SourceInner, default_equals};

pub use primitives::effect::{
    CleanupFn, Effect, EffectFn, effect, effect_tracking, effect_with_cleanup,
};
pub use primitives::scope::{
    EffectScope, ScopeCleanupFn, effect_scope, get_current_scope, on_scope_dispose,
};
pub use primitives::signal::{ReadSignal, Signal, signal, signal_with_equals};
pub use reactivity::tracking::untrack;

// Host capabilities
pub use host::{
    ElementId, FrameCallback, FrameHandle, Host, IntersectionCallback, IntersectionEntry,
    IntersectionObserverInit, Length, ListenerHandle, NodeRef, ObserverHandle, Point,
    PointerEvent, PointerEventKind, PointerListener, Rect, RootMargin, TimerCallback, TimerHandle,
    VirtualHost,
};

// Trackers and their configuration
pub use config::{
    CountUpOptions, MagneticOptions, ScrollRevealOptions, StaggerOptions, TiltOptions,
};
pub use easing::{ease_out_cubic, round_half_up};
pub use error::{EffectsError, Result};
pub use style::{StyleMap, css_number};
pub use trackers::{
    CountUp, CountUpPhase, GlowPosition, MagneticHover, MagneticOffset, PointerGlow,
    ScrollReveal, StaggerReveal, Tilt, TiltTransform, tilt_transform, use_count_up,
    use_magnetic_hover, use_pointer_glow, use_scroll_reveal, use_stagger_reveal, use_tilt,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn host_is_object_safe() {
        let host: Rc<dyn Host> = Rc::new(VirtualHost::new());
        let el = ElementId(0);
        assert!(host.bounding_rect(el).is_none());

        let reveal = use_scroll_reveal(&host, ScrollRevealOptions::default());
        assert!(!reveal.is_visible());
    }

    #[test]
    fn trackers_share_one_scope() {
        let host = Rc::new(VirtualHost::new());
        let el = host.create_element(Rect::new(0.0, 0.0, 200.0, 100.0));
        let scope = effect_scope(false);

        let (glow, tilt, magnet) = scope
            .run(|| {
                (
                    use_pointer_glow(&host),
                    use_tilt(&host, TiltOptions::default()),
                    use_magnetic_hover(&host, MagneticOptions::default()),
                )
            })
            .unwrap();
        glow.node().attach(el);
        tilt.node().attach(el);
        magnet.node().attach(el);
        assert_eq!(host.listener_count(), 5);

        scope.stop();
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn reveal_can_gate_count_up() {
        let host = Rc::new(VirtualHost::new());
        let el = host.create_element(Rect::new(0.0, 100.0, 100.0, 100.0));
        let reveal = use_scroll_reveal(&host, ScrollRevealOptions::default());
        let counter = use_count_up(&host, CountUpOptions::new(5).with_duration_ms(100), reveal.visible());

        reveal.node().attach(el);
        host.next_frame();
        assert!(reveal.is_visible());
        assert_eq!(counter.phase().get_untracked(), CountUpPhase::Animating);

        host.advance(500.0);
        assert_eq!(counter.value().get_untracked(), 5);
        assert_eq!(counter.phase().get_untracked(), CountUpPhase::Done);
    }
}
