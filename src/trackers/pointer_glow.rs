// ============================================================================
// spark-effects - Pointer Glow
// Pointer position inside an element, as percentages, one update per frame
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::cloned;
use crate::host::{
    FrameCallback, FrameHandle, Host, NodeRef, Point, PointerEvent, PointerEventKind,
    PointerListener, Rect,
};
use crate::primitives::effect::{CleanupFn, Effect, effect_with_cleanup};
use crate::primitives::signal::{ReadSignal, Signal, signal};
use crate::style::{StyleMap, css_number};

/// Pointer position relative to an element, in percent of its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowPosition {
    pub x: f64,
    pub y: f64,
}

impl GlowPosition {
    pub const CENTER: GlowPosition = GlowPosition { x: 50.0, y: 50.0 };

    /// Position of `point` inside `rect`, clamped to `[0, 100]` on both
    /// axes. None when `rect` has no usable area or the point is not finite.
    pub fn from_pointer(rect: Rect, point: Point) -> Option<Self> {
        let (fx, fy) = rect.fraction_of(point)?;
        if !fx.is_finite() || !fy.is_finite() {
            return None;
        }
        Some(Self {
            x: (fx * 100.0).clamp(0.0, 100.0),
            y: (fy * 100.0).clamp(0.0, 100.0),
        })
    }

    /// `--glow-x` / `--glow-y` custom properties.
    pub fn style(&self) -> StyleMap {
        StyleMap::new()
            .with("--glow-x", format!("{}%", css_number(self.x)))
            .with("--glow-y", format!("{}%", css_number(self.y)))
    }
}

impl Default for GlowPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Handle returned by [`use_pointer_glow`].
#[derive(Clone, Debug)]
pub struct PointerGlow {
    node: NodeRef,
    position: Signal<GlowPosition>,
    effect: Effect,
}

impl PointerGlow {
    pub fn node(&self) -> NodeRef {
        self.node.clone()
    }

    pub fn position(&self) -> ReadSignal<GlowPosition> {
        self.position.read_only()
    }

    /// Style for the current position. Tracked, so rendering it inside an
    /// effect follows the pointer.
    pub fn style(&self) -> StyleMap {
        self.position.with(GlowPosition::style)
    }

    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

/// Track the pointer over an element for a radial glow.
///
/// Moves are coalesced: each one replaces the pending frame request, and
/// the frame reads the element's rect at that moment, so a burst of moves
/// between frames produces one update with the last sample. Updates against
/// a missing or zero-sized rect are dropped and the previous value kept.
pub fn use_pointer_glow<H>(host: &Rc<H>) -> PointerGlow
where
    H: Host + ?Sized + 'static,
{
    let node = NodeRef::new();
    let position = signal(GlowPosition::CENTER);
    let weak_host = Rc::downgrade(host);

    let effect = effect_with_cleanup(cloned!(node, position => move || {
        let element = node.get()?;
        let host = weak_host.upgrade()?;

        let alive = Rc::new(Cell::new(true));
        let pending: Rc<Cell<Option<FrameHandle>>> = Rc::new(Cell::new(None));

        let on_move: PointerListener = Rc::new(cloned!(alive, pending, position, weak_host =>
            move |event: &PointerEvent| {
                if !alive.get() {
                    return;
                }
                let Some(host) = weak_host.upgrade() else {
                    return;
                };
                if let Some(previous) = pending.take() {
                    host.cancel_animation_frame(previous);
                }

                let point = event.point();
                let frame: FrameCallback = Box::new(cloned!(alive, pending, position, weak_host =>
                    move |_timestamp: f64| {
                        pending.set(None);
                        if !alive.get() {
                            return;
                        }
                        let Some(host) = weak_host.upgrade() else {
                            return;
                        };
                        match host
                            .bounding_rect(element)
                            .and_then(|rect| GlowPosition::from_pointer(rect, point))
                        {
                            Some(next) => {
                                tracing::trace!(?element, x = next.x, y = next.y, "glow moved");
                                position.set(next);
                            }
                            None => tracing::trace!(?element, "glow update dropped, no usable position"),
                        }
                    }
                ));
                pending.set(Some(host.request_animation_frame(frame)));
            }
        ));

        let listener = host.add_pointer_listener(element, PointerEventKind::Move, on_move);
        tracing::debug!(?element, "pointer glow attached");

        let teardown: CleanupFn = Box::new(cloned!(weak_host => move || {
            alive.set(false);
            if let Some(host) = weak_host.upgrade() {
                if let Some(frame) = pending.take() {
                    host.cancel_animation_frame(frame);
                }
                host.remove_pointer_listener(listener);
            }
            tracing::debug!(?element, "pointer glow detached");
        }));
        Some(teardown)
    }));

    PointerGlow {
        node,
        position,
        effect,
    }
}
