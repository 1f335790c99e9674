// ============================================================================
// spark-effects - Geometry
// Client-space points and rectangles
// ============================================================================

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in client (viewport) coordinates, as returned
/// by a bounding-rect query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// True when fractional positions inside this rect are undefined.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.left.is_finite()
            || !self.top.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Overlap of two rects. Edge-adjacent rects overlap with zero area.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left <= right && top <= bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Position of `p` as a fraction of this rect (0 at left/top, 1 at
    /// right/bottom). None for degenerate rects.
    pub fn fraction_of(&self, p: Point) -> Option<(f64, f64)> {
        if self.is_degenerate() {
            return None;
        }
        Some((
            (p.x - self.left) / self.width,
            (p.y - self.top) / self.height,
        ))
    }

    /// Signed offset of `p` from the center in half-extents: -1 at the
    /// left/top edge, +1 at the right/bottom edge. None for degenerate rects.
    pub fn offset_from_center(&self, p: Point) -> Option<(f64, f64)> {
        if self.is_degenerate() {
            return None;
        }
        let c = self.center();
        Some((
            (p.x - c.x) / (self.width / 2.0),
            (p.y - c.y) / (self.height / 2.0),
        ))
    }
}
