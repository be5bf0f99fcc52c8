//! Point Type
//!
//! A coordinate in world space. Graph identity only looks at `x` and `z`;
//! `y` is a rendering elevation.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A point on the ground plane (`y = 0`).
    pub const fn planar(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Euclidean distance in all three axes.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation from `self` toward `other`; `t` is not clamped.
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_uses_all_axes() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(2.0, 3.0, 6.0);
        assert_relative_eq!(a.distance(&b), 7.0);
        assert_relative_eq!(b.distance(&a), 7.0);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Point::new(-5.0, 0.2, 5.0);
        let b = Point::new(5.0, 0.2, 5.0);

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);

        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.x, 0.0);
        assert_relative_eq!(mid.y, 0.2);
        assert_relative_eq!(mid.z, 5.0);
    }

    #[test]
    fn test_display_shows_ground_coordinates() {
        let p = Point::new(1.5, 9.0, -2.25);
        assert_eq!(p.to_string(), "(1.50, -2.25)");
    }
}
