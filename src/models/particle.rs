//! Particle and point types.

use serde::{Deserialize, Serialize};

use super::SurfaceDimensions;

/// A position in surface-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One animated point of the field.
///
/// Particles are never added or removed once a field is built. A particle
/// that drifts off the surface is re-randomized in place by the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Circle radius
    pub r: f64,
    /// Horizontal velocity per frame
    pub vx: f64,
    /// Vertical velocity per frame
    pub vy: f64,
    /// Index into the field palette
    pub color: usize,
    /// Opacity used when filling the circle
    pub alpha: f64,
}

impl Particle {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Integrate position by one frame of velocity.
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Whether the particle lies inside `[0, width] x [0, height]`.
    ///
    /// Both edges are inclusive, so a particle exactly on the border stays.
    pub fn is_within(&self, dims: SurfaceDimensions) -> bool {
        self.x >= 0.0
            && self.x <= dims.width as f64
            && self.y >= 0.0
            && self.y <= dims.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle { x, y, r: 1.0, vx, vy, color: 0, alpha: 0.5 }
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn test_advance_integrates_velocity() {
        let mut p = particle_at(10.0, 20.0, 0.15, -0.1);
        p.advance();
        assert!((p.x - 10.15).abs() < 1e-12);
        assert!((p.y - 19.9).abs() < 1e-12);
    }

    #[test]
    fn test_is_within_inclusive_edges() {
        let dims = SurfaceDimensions::new(800, 600);
        assert!(particle_at(0.0, 0.0, 0.0, 0.0).is_within(dims));
        assert!(particle_at(800.0, 600.0, 0.0, 0.0).is_within(dims));
        assert!(!particle_at(-0.01, 10.0, 0.0, 0.0).is_within(dims));
        assert!(!particle_at(10.0, 600.01, 0.0, 0.0).is_within(dims));
    }

    #[test]
    fn test_is_within_zero_area() {
        let dims = SurfaceDimensions::new(0, 0);
        assert!(particle_at(0.0, 0.0, 0.0, 0.0).is_within(dims));
        assert!(!particle_at(0.1, 0.0, 0.0, 0.0).is_within(dims));
    }
}
