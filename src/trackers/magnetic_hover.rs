// ============================================================================
// spark-effects - Magnetic Hover
// Pull an element toward the pointer, spring back on leave
// ============================================================================

use std::rc::Rc;

use crate::cloned;
use crate::config::MagneticOptions;
use crate::easing::SPRING_BACK_TIMING;
use crate::host::{
    Host, NodeRef, Point, PointerEvent, PointerEventKind, PointerListener, Rect,
};
use crate::primitives::effect::{CleanupFn, Effect, effect_with_cleanup};
use crate::primitives::signal::{ReadSignal, Signal, signal};
use crate::style::{StyleMap, css_number};

/// Transition while following the pointer
pub const FOLLOW_TRANSITION: &str = "transform 0.15s ease-out";

/// Offset of the element from its resting place, in px.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MagneticOffset {
    pub x: f64,
    pub y: f64,
}

impl MagneticOffset {
    pub const REST: MagneticOffset = MagneticOffset { x: 0.0, y: 0.0 };

    /// Offset for a pointer at `point` over `rect`: `strength` px at the
    /// element's edges, growing past them. None when `rect` has no usable
    /// area.
    pub fn from_pointer(rect: Rect, point: Point, strength: f64) -> Option<Self> {
        let (dx, dy) = rect.offset_from_center(point)?;
        Some(Self {
            x: dx * strength,
            y: dy * strength,
        })
    }

    pub fn is_rest(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// `transform` and `transition` for this offset. Resting uses the slower
    /// spring-back curve.
    pub fn style(&self) -> StyleMap {
        let transition = if self.is_rest() {
            format!("transform 0.4s {SPRING_BACK_TIMING}")
        } else {
            FOLLOW_TRANSITION.to_string()
        };
        StyleMap::new()
            .with(
                "transform",
                format!("translate({}px, {}px)", css_number(self.x), css_number(self.y)),
            )
            .with("transition", transition)
    }
}

/// Handle returned by [`use_magnetic_hover`].
#[derive(Clone, Debug)]
pub struct MagneticHover {
    node: NodeRef,
    offset: Signal<MagneticOffset>,
    effect: Effect,
}

impl MagneticHover {
    pub fn node(&self) -> NodeRef {
        self.node.clone()
    }

    pub fn offset(&self) -> ReadSignal<MagneticOffset> {
        self.offset.read_only()
    }

    /// Style for the current offset. Tracked.
    pub fn style(&self) -> StyleMap {
        self.offset.with(MagneticOffset::style)
    }

    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

/// Offset an element toward the pointer while hovered.
pub fn use_magnetic_hover<H>(host: &Rc<H>, options: MagneticOptions) -> MagneticHover
where
    H: Host + ?Sized + 'static,
{
    let strength = options.sanitized().strength;
    let node = NodeRef::new();
    let offset = signal(MagneticOffset::REST);
    let weak_host = Rc::downgrade(host);

    let effect = effect_with_cleanup(cloned!(node, offset => move || {
        let element = node.get()?;
        let host = weak_host.upgrade()?;

        let on_move: PointerListener = Rc::new(cloned!(offset, weak_host => move |event: &PointerEvent| {
            let Some(host) = weak_host.upgrade() else {
                return;
            };
            let next = host
                .bounding_rect(element)
                .and_then(|rect| MagneticOffset::from_pointer(rect, event.point(), strength));
            if let Some(next) = next {
                tracing::trace!(?element, x = next.x, y = next.y, "magnetic pull");
                offset.set(next);
            }
        }));

        let on_leave: PointerListener = Rc::new(cloned!(offset => move |_: &PointerEvent| {
            offset.set(MagneticOffset::REST);
        }));

        let listeners = [
            host.add_pointer_listener(element, PointerEventKind::Move, on_move),
            host.add_pointer_listener(element, PointerEventKind::Leave, on_leave),
        ];
        tracing::debug!(?element, strength, "magnetic hover attached");

        let teardown: CleanupFn = Box::new(cloned!(weak_host => move || {
            if let Some(host) = weak_host.upgrade() {
                for listener in listeners {
                    host.remove_pointer_listener(listener);
                }
            }
            tracing::debug!(?element, "magnetic hover detached");
        }));
        Some(teardown)
    }));

    MagneticHover {
        node,
        offset,
        effect,
    }
}
