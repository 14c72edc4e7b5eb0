use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Vec2) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub center: Vec2,
    pub side: f32,
}

impl Square {
    /// Radius of the circumscribed circle, used wherever a square takes part
    /// in a circle-vs-circle overlap or distance test.
    pub fn bound_radius(self) -> f32 {
        self.side * std::f32::consts::SQRT_2 / 2.0
    }

    pub fn half_side(self) -> f32 {
        self.side / 2.0
    }
}

pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance_to(b) < a_radius + b_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
    }

    #[test]
    fn square_bound_radius_is_half_diagonal() {
        let sq = Square {
            center: Vec2::ZERO,
            side: 100.0,
        };
        assert!((sq.bound_radius() - 70.7107).abs() < 1e-3);
    }

    #[test]
    fn overlap_is_strict_on_the_boundary() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Touching circles do not count as overlapping.
        assert!(!circles_overlap(a, 5.0, b, 5.0));
        assert!(circles_overlap(a, 5.1, b, 5.0));
    }
}
