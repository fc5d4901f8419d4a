//! Hook geometry in screen space
//!
//! Screen coordinates: x grows right, y grows down. The hook hangs from a
//! fixed origin; an angle of 0° points straight down and positive angles
//! swing toward +x. Every conversion in the crate goes through this module
//! so the sign convention cannot drift between capture, targeting and
//! obstacle projection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_angle;

/// Endpoint of a hook hanging from `origin` at `angle_deg` with rope `length`
#[inline]
pub fn hook_endpoint(origin: Vec2, angle_deg: f32, length: f32) -> Vec2 {
    let theta = angle_deg.to_radians();
    origin + Vec2::new(theta.sin(), theta.cos()) * length
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Swing angle (degrees) that points the hook from `origin` at `point`,
/// clamped to the legal swing range.
pub fn angle_to(origin: Vec2, point: Vec2) -> f32 {
    let rel = point - origin;
    clamp_angle(rel.x.atan2(rel.y).to_degrees())
}

/// Axis-aligned rectangle (min = top-left, max = bottom-right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

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

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Length of the diagonal (largest distance inside the rectangle)
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec2 = Vec2::new(400.0, 60.0);

    #[test]
    fn test_endpoint_straight_down() {
        let p = hook_endpoint(ORIGIN, 0.0, 200.0);
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 260.0).abs() < 1e-3);
    }

    #[test]
    fn test_positive_angle_swings_right() {
        let p = hook_endpoint(ORIGIN, 30.0, 100.0);
        assert!(p.x > ORIGIN.x);
        assert!(p.y > ORIGIN.y);

        let q = hook_endpoint(ORIGIN, -30.0, 100.0);
        assert!(q.x < ORIGIN.x);
        assert!((p.y - q.y).abs() < 1e-3);
    }

    #[test]
    fn test_angle_to_inverts_endpoint() {
        for angle in [-75.0_f32, -40.0, -5.0, 0.0, 12.5, 60.0, 79.0] {
            let p = hook_endpoint(ORIGIN, angle, 250.0);
            assert!((angle_to(ORIGIN, p) - angle).abs() < 1e-3, "angle {angle}");
        }
    }

    #[test]
    fn test_angle_to_clamps() {
        // Level with the origin, far to the right: 90° unclamped
        let a = angle_to(ORIGIN, Vec2::new(800.0, 60.0));
        assert_eq!(a, crate::consts::MAX_ANGLE);
        let b = angle_to(ORIGIN, Vec2::new(0.0, 60.0));
        assert_eq!(b, -crate::consts::MAX_ANGLE);
    }

    #[test]
    fn test_rect_expand_contains() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        assert!(r.contains(Vec2::new(20.0, 20.0)));
        assert!(!r.contains(Vec2::new(33.0, 20.0)));
        assert!(r.expand(5.0).contains(Vec2::new(33.0, 20.0)));
        assert_eq!(r.center(), Vec2::new(20.0, 20.0));
    }
}
