// ============================================================================
// spark-effects - Tilt
// 3D tilt toward the pointer, written straight to the element's transform
// ============================================================================
//
// Tilt keeps no reactive state. Every pointer sample becomes an inline
// `transform` write through the host and the CSS transition set on setup
// smooths between samples.
// ============================================================================

use std::rc::Rc;

use crate::cloned;
use crate::config::TiltOptions;
use crate::easing::TILT_TIMING;
use crate::host::{Host, NodeRef, Point, PointerEvent, PointerEventKind, PointerListener, Rect};
use crate::primitives::effect::{CleanupFn, Effect, effect_with_cleanup};
use crate::style::css_number;

/// Perspective distance of the tilt transform, in px
pub const PERSPECTIVE_PX: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTransform {
    /// Degrees around the horizontal axis; positive tips the top edge back
    pub rotate_x: f64,
    /// Degrees around the vertical axis; positive tips the right edge back
    pub rotate_y: f64,
    pub scale: f64,
}

impl TiltTransform {
    pub const NEUTRAL: TiltTransform = TiltTransform {
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
    };

    pub fn to_css(&self) -> String {
        let s = css_number(self.scale);
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) scale3d({s}, {s}, {s})",
            css_number(PERSPECTIVE_PX),
            css_number(self.rotate_x),
            css_number(self.rotate_y),
        )
    }
}

impl Default for TiltTransform {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Transform for a pointer at `point` over `rect`.
///
/// At the element's edges the rotation reaches `max_tilt`; past them it
/// keeps growing. None when `rect` has no usable area.
pub fn tilt_transform(rect: Rect, point: Point, options: &TiltOptions) -> Option<TiltTransform> {
    let (dx, dy) = rect.offset_from_center(point)?;
    Some(TiltTransform {
        rotate_x: -dy * options.max_tilt,
        rotate_y: dx * options.max_tilt,
        scale: options.scale,
    })
}

/// The `transition` value installed on setup.
pub fn tilt_transition(speed_ms: u32) -> String {
    format!("transform {speed_ms}ms {TILT_TIMING}")
}

/// Handle returned by [`use_tilt`].
#[derive(Clone, Debug)]
pub struct Tilt {
    node: NodeRef,
    effect: Effect,
}

impl Tilt {
    pub fn node(&self) -> NodeRef {
        self.node.clone()
    }

    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

/// Tilt an element toward the pointer.
pub fn use_tilt<H>(host: &Rc<H>, options: TiltOptions) -> Tilt
where
    H: Host + ?Sized + 'static,
{
    let options = options.sanitized();
    let node = NodeRef::new();
    let weak_host = Rc::downgrade(host);

    let effect = effect_with_cleanup(cloned!(node => move || {
        let element = node.get()?;
        let host = weak_host.upgrade()?;

        host.set_style(element, "transition", &tilt_transition(options.speed_ms));
        host.set_style(element, "will-change", "transform");

        let on_move: PointerListener = Rc::new(cloned!(weak_host => move |event: &PointerEvent| {
            let Some(host) = weak_host.upgrade() else {
                return;
            };
            let Some(rect) = host.bounding_rect(element) else {
                return;
            };
            match tilt_transform(rect, event.point(), &options) {
                Some(transform) => {
                    tracing::trace!(
                        ?element,
                        rotate_x = transform.rotate_x,
                        rotate_y = transform.rotate_y,
                        "tilt"
                    );
                    host.set_style(element, "transform", &transform.to_css());
                }
                None => tracing::trace!(?element, "tilt ignored, degenerate rect"),
            }
        }));

        let on_leave: PointerListener = Rc::new(cloned!(weak_host => move |_: &PointerEvent| {
            if let Some(host) = weak_host.upgrade() {
                host.set_style(element, "transform", &TiltTransform::NEUTRAL.to_css());
            }
        }));

        let listeners = [
            host.add_pointer_listener(element, PointerEventKind::Move, on_move),
            host.add_pointer_listener(element, PointerEventKind::Leave, on_leave),
        ];
        tracing::debug!(?element, max_tilt = options.max_tilt, "tilt attached");

        let teardown: CleanupFn = Box::new(cloned!(weak_host => move || {
            if let Some(host) = weak_host.upgrade() {
                for listener in listeners {
                    host.remove_pointer_listener(listener);
                }
            }
            tracing::debug!(?element, "tilt detached");
        }));
        Some(teardown)
    }));

    Tilt { node, effect }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_reaches_max_tilt() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let t = tilt_transform(rect, Point::new(200.0, 0.0), &TiltOptions::default()).unwrap();
        assert_eq!(t.rotate_x, 8.0);
        assert_eq!(t.rotate_y, 8.0);
        assert_eq!(t.scale, 1.02);
    }

    #[test]
    fn center_is_flat() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        let t = tilt_transform(rect, Point::new(60.0, 60.0), &TiltOptions::default()).unwrap();
        assert_eq!(
            t.to_css(),
            "perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1.02, 1.02, 1.02)"
        );
    }

    #[test]
    fn neutral_css() {
        assert_eq!(
            TiltTransform::NEUTRAL.to_css(),
            "perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)"
        );
    }

    #[test]
    fn degenerate_rect_has_no_transform() {
        let rect = Rect::new(0.0, 0.0, 100.0, -1.0);
        assert!(tilt_transform(rect, Point::new(0.0, 0.0), &TiltOptions::default()).is_none());
    }

    #[test]
    fn transition_string() {
        assert_eq!(
            tilt_transition(400),
            "transform 400ms cubic-bezier(0.03, 0.98, 0.52, 0.99)"
        );
    }
}
