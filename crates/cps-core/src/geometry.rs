//! Point-set helpers

use glam::DVec3;

use crate::tolerance::Tolerance;

/// Arithmetic mean of a point set (origin when empty)
pub fn mean_point(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

/// Remove points within `tolerance` of an earlier point, keeping first occurrences
pub fn dedup_points(points: impl IntoIterator<Item = DVec3>, tolerance: Tolerance) -> Vec<DVec3> {
    let mut unique: Vec<DVec3> = Vec::new();
    for p in points {
        if !unique.iter().any(|q| tolerance.points_equal(p, *q)) {
            unique.push(p);
        }
    }
    unique
}

/// Unnormalized normal of the triangle `(a, b, c)`
pub fn triangle_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a)
}

/// Normalize `v`, or `None` when its length is at or below `epsilon`
pub fn try_normalize(v: DVec3, epsilon: f64) -> Option<DVec3> {
    let len = v.length();
    (len > epsilon).then(|| v / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_point() {
        let pts = [DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::new(1.0, 3.0, 0.0)];
        assert_eq!(mean_point(&pts), DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(mean_point(&[]), DVec3::ZERO);
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let pts = vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0 + 1e-6, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 1e-5, 0.0),
        ];
        let unique = dedup_points(pts, Tolerance::POINT);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0], DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_try_normalize() {
        assert!(try_normalize(DVec3::new(1e-7, 0.0, 0.0), 1e-6).is_none());
        let n = try_normalize(DVec3::new(0.0, 3.0, 4.0), 1e-6).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }
}
