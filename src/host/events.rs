// ============================================================================
// spark-effects - Host Events
// ============================================================================

use crate::host::geometry::{Point, Rect};
use crate::host::margin::RootMargin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Move,
    Leave,
}

/// A pointer sample in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn moved(client_x: f64, client_y: f64) -> Self {
        Self {
            kind: PointerEventKind::Move,
            client_x,
            client_y,
        }
    }

    pub fn left(client_x: f64, client_y: f64) -> Self {
        Self {
            kind: PointerEventKind::Leave,
            client_x,
            client_y,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

/// One intersection observation for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Host clock time of the observation, in ms
    pub time: f64,
    /// Share of the element's area inside the margin-adjusted root
    pub intersection_ratio: f64,
    /// Whether the element touches the margin-adjusted root at all
    pub is_intersecting: bool,
    pub bounding_client_rect: Rect,
}

impl IntersectionEntry {
    /// Whether this observation satisfies `threshold`.
    pub fn meets(&self, threshold: f64) -> bool {
        self.is_intersecting && self.intersection_ratio >= threshold
    }
}

/// Options for an intersection observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionObserverInit {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for IntersectionObserverInit {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::ZERO,
        }
    }
}
