//! Tolerance constants for geometric comparisons

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Default tolerance for matching points (vertex deduplication, v3 search)
pub const POINT_TOLERANCE: f64 = 1e-4;

/// Default tolerance for plane membership tests
pub const PLANE_TOLERANCE: f64 = 1e-3;

/// Default tolerance for merging sketch endpoints into one vertex
pub const MERGE_TOLERANCE: f64 = 1e-3;

/// Default length below which an edge is considered degenerate
pub const DEGENERATE_TOLERANCE: f64 = 1e-3;

/// Lengths at or below this are treated as zero when normalizing
pub const NORMAL_EPSILON: f64 = 1e-6;

/// A linear distance tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Maximum distance (exclusive) at which two points are equal
    pub linear: f64,
}

impl Tolerance {
    /// Point matching tolerance (1e-4)
    pub const POINT: Self = Self::new(POINT_TOLERANCE);

    /// Vertex merge tolerance (1e-3)
    pub const MERGE: Self = Self::new(MERGE_TOLERANCE);

    /// Create a tolerance with the given linear distance
    pub const fn new(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if two points are coincident within tolerance
    pub fn points_equal(&self, a: DVec3, b: DVec3) -> bool {
        a.distance(b) < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::POINT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_equal() {
        let tol = Tolerance::POINT;
        let a = DVec3::new(1.0, 2.0, 3.0);
        assert!(tol.points_equal(a, DVec3::new(1.0 + 5e-5, 2.0, 3.0)));
        assert!(!tol.points_equal(a, DVec3::new(1.001, 2.0, 3.0)));
    }

    #[test]
    fn test_tolerances_are_distinct() {
        assert!(Tolerance::POINT.linear < Tolerance::MERGE.linear);
        assert_eq!(Tolerance::default(), Tolerance::POINT);
        // 5e-4 apart: merged as sketch vertices, distinct as points
        let a = DVec3::ZERO;
        let b = DVec3::new(5e-4, 0.0, 0.0);
        assert!(Tolerance::MERGE.points_equal(a, b));
        assert!(!Tolerance::POINT.points_equal(a, b));
    }
}
