//! Axis-aligned bounding boxes
//!
//! Every collision in the game is a box-box overlap. Edges that merely touch
//! do not count as overlapping.

use glam::Vec2;

/// An axis-aligned box in playfield pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f32, y: f32, side: f32) -> Aabb {
        Aabb::from_pos_size(Vec2::new(x, y), Vec2::splat(side))
    }

    #[test]
    fn test_overlapping_boxes() {
        let player = square(10.0, 750.0, 40.0);
        let obstacle = square(20.0, 760.0, 40.0);
        assert!(player.overlaps(&obstacle));
        assert!(obstacle.overlaps(&player));
    }

    #[test]
    fn test_separated_boxes() {
        let player = square(0.0, 0.0, 40.0);
        let obstacle = square(100.0, 0.0, 40.0);
        assert!(!player.overlaps(&obstacle));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = square(0.0, 0.0, 40.0);
        assert!(!a.overlaps(&square(40.0, 0.0, 40.0)));
        assert!(!a.overlaps(&square(0.0, 40.0, 40.0)));
        assert!(!a.overlaps(&square(-40.0, 0.0, 40.0)));
        assert!(!a.overlaps(&square(0.0, -40.0, 40.0)));
        assert!(a.overlaps(&square(39.9, 39.9, 40.0)));
    }

    #[test]
    fn test_contained_box_overlaps() {
        let outer = square(0.0, 0.0, 100.0);
        let inner = square(40.0, 40.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_dimensions() {
        let b = Aabb::from_pos_size(Vec2::new(5.0, 10.0), Vec2::new(30.0, 20.0));
        assert_eq!(b.width(), 30.0);
        assert_eq!(b.height(), 20.0);
        assert_eq!(b.center(), Vec2::new(20.0, 20.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let a = Aabb::from_pos_size(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::from_pos_size(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_box_overlaps_itself(x in -500.0f32..500.0, y in -500.0f32..500.0, side in 1.0f32..100.0) {
            let a = square(x, y, side);
            prop_assert!(a.overlaps(&a));
        }
    }
}
