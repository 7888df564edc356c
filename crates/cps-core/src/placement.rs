//! Placements (rigid frames) and their construction from plane normals

use std::f64::consts::PI;

use glam::{DAffine3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::geometry::try_normalize;
use crate::tolerance::NORMAL_EPSILON;

/// `|dot(normal, Z)|` above which a normal is treated as axis-aligned
pub const AXIS_ALIGNED_THRESHOLD: f64 = 0.999;

/// A rigid transform: rotation followed by translation to `base`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Origin of the local frame in global coordinates
    pub base: DVec3,
    /// Orientation of the local frame
    pub rotation: DQuat,
}

impl Placement {
    /// The identity placement
    pub const IDENTITY: Self = Self {
        base: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Create a placement from an origin and a rotation
    pub fn new(base: DVec3, rotation: DQuat) -> Self {
        Self { base, rotation }
    }

    /// Pure translation
    pub fn from_translation(base: DVec3) -> Self {
        Self::new(base, DQuat::IDENTITY)
    }

    /// Map a local point to global coordinates
    pub fn mult_vec(&self, p: DVec3) -> DVec3 {
        self.rotation * p + self.base
    }

    /// The inverse placement (global to local)
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            base: rotation * -self.base,
            rotation,
        }
    }

    /// Compose: `self * other` (apply `other` first)
    pub fn multiply(&self, other: &Placement) -> Self {
        Self {
            base: self.base + self.rotation * other.base,
            rotation: (self.rotation * other.rotation).normalize(),
        }
    }

    /// Local Z axis in global coordinates
    pub fn z_axis(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }

    /// Equivalent affine transform
    pub fn to_affine(&self) -> DAffine3 {
        DAffine3::from_rotation_translation(self.rotation, self.base)
    }

    /// Compare two placements by origin and by the images of the basis axes
    pub fn abs_diff_eq(&self, other: &Placement, tolerance: f64) -> bool {
        self.base.abs_diff_eq(other.base, tolerance)
            && [DVec3::X, DVec3::Y, DVec3::Z]
                .into_iter()
                .all(|axis| (self.rotation * axis).abs_diff_eq(other.rotation * axis, tolerance))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Build a placement whose local Z axis is `normal`, located at `origin`
///
/// A zero-length normal is replaced by `(0,0,1)`. Normals within
/// [`AXIS_ALIGNED_THRESHOLD`] of world Z get the identity rotation (or a half
/// turn about X when pointing down) instead of a shortest-arc rotation.
pub fn build_placement(normal: DVec3, origin: DVec3) -> Placement {
    build_placement_with_epsilon(normal, origin, NORMAL_EPSILON)
}

/// [`build_placement`] treating normals of length `epsilon` or less as zero
pub fn build_placement_with_epsilon(normal: DVec3, origin: DVec3, epsilon: f64) -> Placement {
    let normal = try_normalize(normal, epsilon).unwrap_or(DVec3::Z);

    let rotation = if normal.dot(DVec3::Z).abs() > AXIS_ALIGNED_THRESHOLD {
        if normal.z > 0.0 {
            DQuat::IDENTITY
        } else {
            DQuat::from_axis_angle(DVec3::X, PI)
        }
    } else {
        DQuat::from_rotation_arc(DVec3::Z, normal)
    };

    Placement::new(origin, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_cases() {
        let up = build_placement(DVec3::new(0.0, 0.0, 5.0), DVec3::ONE);
        assert_eq!(up.rotation, DQuat::IDENTITY);
        assert_eq!(up.base, DVec3::ONE);

        let down = build_placement(DVec3::new(0.01, 0.0, -1.0), DVec3::ZERO);
        let z = down.z_axis();
        assert_relative_eq!(z.z, -1.0, epsilon = 1e-12);
        // Half turn about X keeps local X on world X
        assert_relative_eq!((down.rotation * DVec3::X).x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_normal_falls_back_to_z() {
        let p = build_placement(DVec3::ZERO, DVec3::ZERO);
        assert_eq!(p.rotation, DQuat::IDENTITY);
    }

    #[test]
    fn test_short_normal_below_epsilon_falls_back_to_z() {
        let n = DVec3::new(0.0, 0.05, 0.0);
        assert_eq!(build_placement_with_epsilon(n, DVec3::ZERO, 0.1).rotation, DQuat::IDENTITY);
        assert!(build_placement(n, DVec3::ZERO).z_axis().abs_diff_eq(DVec3::Y, 1e-12));
    }

    #[test]
    fn test_general_normal_maps_z() {
        let n = DVec3::new(1.0, 2.0, 0.5).normalize();
        let p = build_placement(n, DVec3::new(3.0, 0.0, 0.0));
        assert!(p.z_axis().abs_diff_eq(n, 1e-12));
    }

    #[test]
    fn test_idempotent_on_own_normal() {
        for n in [
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(-1.0, 0.2, 0.3),
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(0.3, -0.3, 0.9),
        ] {
            let first = build_placement(n, DVec3::ZERO);
            let normal = first.z_axis();
            let second = build_placement(normal, DVec3::ZERO);
            assert!(
                second.z_axis().abs_diff_eq(normal, 1e-9),
                "{:?} != {:?}",
                second.z_axis(),
                normal
            );
        }
    }

    #[test]
    fn test_inverse_maps_origin_to_local_origin() {
        let p = build_placement(DVec3::new(1.0, 1.0, 1.0), DVec3::new(4.0, -2.0, 7.0));
        let local = p.inverse().mult_vec(p.base);
        assert!(local.abs_diff_eq(DVec3::ZERO, 1e-12));

        let q = DVec3::new(0.5, -1.5, 2.0);
        let round_trip = p.mult_vec(p.inverse().mult_vec(q));
        assert!(round_trip.abs_diff_eq(q, 1e-12));
        assert!(p.multiply(&p.inverse()).abs_diff_eq(&Placement::IDENTITY, 1e-12));
    }

    #[test]
    fn test_affine_matches_mult_vec() {
        let p = build_placement(DVec3::new(0.0, 1.0, 1.0), DVec3::new(1.0, 2.0, 3.0));
        let q = DVec3::new(-2.0, 0.5, 1.0);
        assert!(p.to_affine().transform_point3(q).abs_diff_eq(p.mult_vec(q), 1e-12));
    }
}
