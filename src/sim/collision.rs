//! Collision detection between hit boxes
//!
//! Sprites are mostly whitespace, so gameplay checks shrink both boxes by a
//! tolerance before testing overlap. A box shrunk to nothing never collides.

use super::geometry::Rect;

/// Detailed overlap between two boxes (diagnostics only)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionInfo {
    pub has_collision: bool,
    pub overlap_x: f32,
    pub overlap_y: f32,
    pub overlap_area: f32,
}

/// Plain AABB test
#[inline]
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    let hit = a.intersects(b);
    if hit {
        log::trace!("Collision detected: {} intersects {}", a, b);
    }
    hit
}

/// AABB test after shrinking both boxes by `tolerance` on every side
pub fn check_collision_with_tolerance(a: &Rect, b: &Rect, tolerance: f32) -> bool {
    let a = a.shrink(tolerance);
    let b = b.shrink(tolerance);

    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }

    check_collision(&a, &b)
}

/// Overlap extents; all zero when the boxes do not collide
pub fn collision_info(a: &Rect, b: &Rect) -> CollisionInfo {
    if !a.intersects(b) {
        return CollisionInfo::default();
    }

    let overlap_x = a.right().min(b.right()) - a.left().max(b.left());
    let overlap_y = a.bottom().min(b.bottom()) - a.top().max(b.top());

    CollisionInfo {
        has_collision: true,
        overlap_x,
        overlap_y,
        overlap_area: overlap_x * overlap_y,
    }
}
