#![forbid(unsafe_code)]

//! Geometric primitives.

/// A node rectangle in integer pixels.
///
/// Edges follow the usual raster convention: `left`/`top` inclusive,
/// `right`/`bottom` exclusive, origin at the top-left of the lock area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from its four edges.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a square of side `size` with its top-left corner at `(left, top)`.
    #[inline]
    pub const fn square(left: i32, top: i32, size: i32) -> Self {
        Self::new(left, top, left + size, top + size)
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Horizontal center, truncated to a whole pixel.
    #[inline]
    pub const fn center_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    /// Vertical center, truncated to a whole pixel.
    #[inline]
    pub const fn center_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.center_x() as f32, self.center_y() as f32)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Check if a point lies inside the rectangle grown by `margin` on every side.
    ///
    /// The grown rectangle keeps the half-open convention:
    /// `x ∈ [left - margin, right + margin)`.
    #[inline]
    pub fn contains_expanded(&self, x: f32, y: f32, margin: f32) -> bool {
        x >= self.left as f32 - margin
            && x < self.right as f32 + margin
            && y >= self.top as f32 - margin
            && y < self.bottom as f32 + margin
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }
}

/// A sub-pixel point, used for the raw pointer position and line endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect};

    #[test]
    fn rect_square_and_center() {
        let rect = Rect::square(10, 20, 30);
        assert_eq!(rect, Rect::new(10, 20, 40, 50));
        assert_eq!(rect.width(), 30);
        assert_eq!(rect.height(), 30);
        assert_eq!(rect.center_x(), 25);
        assert_eq!(rect.center_y(), 35);
        assert_eq!(rect.center(), Point::new(25.0, 35.0));
    }

    #[test]
    fn contains_expanded_is_half_open() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains_expanded(10.0, 10.0, 0.0));
        assert!(rect.contains_expanded(19.9, 19.9, 0.0));
        assert!(!rect.contains_expanded(20.0, 15.0, 0.0));
        assert!(!rect.contains_expanded(15.0, 20.0, 0.0));
    }

    #[test]
    fn contains_expanded_grows_every_side() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains_expanded(5.0, 5.0, 5.0));
        assert!(rect.contains_expanded(24.5, 24.5, 5.0));
        assert!(!rect.contains_expanded(25.0, 15.0, 5.0));
        assert!(!rect.contains_expanded(4.9, 15.0, 5.0));
    }

    #[test]
    fn intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 6, 6);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(2, 2, 4, 4)));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(4, 0, 8, 4);
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn empty_rect() {
        assert!(Rect::default().is_empty());
        assert!(Rect::new(5, 5, 5, 9).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
