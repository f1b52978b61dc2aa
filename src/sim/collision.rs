//! Circle collision tests
//!
//! Everything in the game is a circle, so contact reduces to comparing the
//! centre distance against the summed radii.

use glam::Vec2;

use super::entity::Circle;
use super::state::Viewport;
use crate::consts::CONTACT_GAP;

/// Gap between two circle edges (negative when overlapping)
#[inline]
pub fn edge_gap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> f32 {
    a_pos.distance(b_pos) - a_radius - b_radius
}

/// Two circles touch when their edges are less than one unit apart
#[inline]
pub fn circles_collide(a: &Circle, b: &Circle) -> bool {
    edge_gap(a.pos, a.radius, b.pos, b.radius) < CONTACT_GAP
}

/// Whether a shot has left the viewport (measured at its leading edge on each axis)
pub fn outside_viewport(circle: &Circle, viewport: Viewport) -> bool {
    let edge = circle.pos + Vec2::splat(circle.radius);
    edge.x <= 0.0 || edge.x >= viewport.width || edge.y <= 0.0 || edge.y >= viewport.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Rgb;

    fn circle(x: f32, y: f32, r: f32) -> Circle {
        Circle::new(Vec2::new(x, y), r, Rgb::WHITE)
    }

    #[test]
    fn test_overlapping_circles_collide() {
        // 9 - 5 - 5 = -1 < 1
        assert!(circles_collide(&circle(0.0, 0.0, 5.0), &circle(9.0, 0.0, 5.0)));
    }

    #[test]
    fn test_separated_circles_miss() {
        // 12 - 5 - 5 = 2 >= 1
        assert!(!circles_collide(&circle(0.0, 0.0, 5.0), &circle(12.0, 0.0, 5.0)));
    }

    #[test]
    fn test_contact_threshold_is_exclusive() {
        // 11 - 5 - 5 = 1, not < 1
        assert!(!circles_collide(&circle(0.0, 0.0, 5.0), &circle(11.0, 0.0, 5.0)));
        assert!(circles_collide(&circle(0.0, 0.0, 5.0), &circle(10.5, 0.0, 5.0)));
    }

    #[test]
    fn test_collision_is_symmetric() {
        let a = circle(3.0, 4.0, 2.0);
        let b = circle(6.0, 8.0, 3.5);
        assert_eq!(circles_collide(&a, &b), circles_collide(&b, &a));
    }

    #[test]
    fn test_outside_viewport() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(!outside_viewport(&circle(400.0, 300.0, 5.0), vp));
        assert!(outside_viewport(&circle(-6.0, 300.0, 5.0), vp));
        assert!(outside_viewport(&circle(796.0, 300.0, 5.0), vp));
        assert!(outside_viewport(&circle(400.0, -5.0, 5.0), vp));
        assert!(outside_viewport(&circle(400.0, 600.0, 5.0), vp));
    }
}
