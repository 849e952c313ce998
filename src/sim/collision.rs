//! Axis-aligned boxes and overlap testing
//!
//! Everything in the arena is a rectangle: walls, paddles and the ball. The
//! same value type serves as render placement and collider.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Same size, moved by (dx, dy)
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Convenience wrapper around [`overlaps`]
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// Check whether two boxes overlap
///
/// Intervals are half-open: boxes that only share an edge do not collide.
/// Edges are computed in `i64`, so any coordinates are accepted.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    let (a_left, a_top) = (a.x as i64, a.y as i64);
    let (a_right, a_bottom) = (a_left + a.w as i64, a_top + a.h as i64);
    let (b_left, b_top) = (b.x as i64, b.y as i64);
    let (b_right, b_bottom) = (b_left + b.w as i64, b_top + b.h as i64);

    if a_bottom <= b_top {
        return false;
    }
    if a_top >= b_bottom {
        return false;
    }
    if a_left >= b_right {
        return false;
    }
    if a_right <= b_left {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(overlaps(&a, &b));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);

        // Right edge of a == left edge of b
        assert!(!overlaps(&a, &Rect::new(10, 0, 10, 10)));
        // Bottom edge of a == top edge of b
        assert!(!overlaps(&a, &Rect::new(0, 10, 10, 10)));
        // Corner contact only
        assert!(!overlaps(&a, &Rect::new(10, 10, 5, 5)));
    }

    #[test]
    fn test_one_pixel_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(overlaps(&a, &Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn test_containment() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 5, 5);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_translated_keeps_size() {
        let r = Rect::new(3, 4, 7, 53).translated(-3, 10);
        assert_eq!(r, Rect::new(0, 14, 7, 53));
    }

    #[test]
    fn test_edges_near_i32_max() {
        let a = Rect::new(i32::MAX - 2, 0, 9, 9);
        let b = Rect::new(i32::MAX - 1, 0, 1, 1);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));

        // Right edge past i32::MAX still ends before a box further left
        let left = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert!(!overlaps(&a, &left));
        assert!(overlaps(&left, &Rect::new(-2, -2, 1, 1)));
    }

    /// Boxes near the playfield
    fn any_rect() -> impl Strategy<Value = Rect> {
        (-600i32..600, -600i32..600, 1i32..200, 1i32..200)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    /// Boxes anywhere in `i32` space, of any positive size
    fn extreme_rect() -> impl Strategy<Value = Rect> {
        (any::<i32>(), any::<i32>(), 1i32..=i32::MAX, 1i32..=i32::MAX)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in any_rect(), b in any_rect()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_box_overlaps_itself(a in any_rect()) {
            prop_assert!(overlaps(&a, &a));
        }

        #[test]
        fn prop_extreme_boxes_are_symmetric(a in extreme_rect(), b in extreme_rect()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
            prop_assert!(overlaps(&a, &a));
        }

        #[test]
        fn prop_side_by_side_never_overlaps(a in any_rect(), w in 1i32..200, dy in -50i32..50) {
            let b = Rect::new(a.right(), a.y + dy, w, a.h);
            prop_assert!(!overlaps(&a, &b));
        }
    }
}
