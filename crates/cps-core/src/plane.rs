//! Plane representation and best-fit estimation
//!
//! The estimator picks, among every triple of the (centered) input points,
//! the triangle with the largest cross-product magnitude. Near-collinear
//! triples produce small, noise-dominated normals and lose against
//! well-conditioned ones. The search is cubic in the number of points, so
//! inputs are expected to be small (the vertices of a few dozen edges).

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::edge::EdgeRef;
use crate::geometry::{mean_point, triangle_normal, try_normalize};
use crate::tolerance::{NORMAL_EPSILON, Tolerance};
use crate::{GeometryError, GeometryResult};

/// A plane defined by a point on it and a unit normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// A point on the plane
    pub point: DVec3,
    /// Unit normal
    pub normal: DVec3,
}

impl Plane {
    /// Create a plane, normalizing `normal`
    pub fn new(point: DVec3, normal: DVec3) -> GeometryResult<Self> {
        Self::with_epsilon(point, normal, NORMAL_EPSILON)
    }

    /// Create a plane; normals of length `epsilon` or less are rejected
    pub fn with_epsilon(point: DVec3, normal: DVec3, epsilon: f64) -> GeometryResult<Self> {
        let normal = try_normalize(normal, epsilon).ok_or_else(|| {
            GeometryError::DegenerateInput(format!("zero-length plane normal {normal}"))
        })?;
        Ok(Self { point, normal })
    }

    /// Plane of a planar face: surface axis through the face's center of mass
    pub fn from_face(axis: DVec3, center_of_mass: DVec3, epsilon: f64) -> GeometryResult<Self> {
        Self::with_epsilon(center_of_mass, axis, epsilon)
    }

    /// Plane spanned by two edges
    ///
    /// `v1` and `v2` are the endpoints of `first`; `v3` is the first endpoint
    /// of `second` that matches neither of them within `point_tolerance`.
    /// A cross product shorter than `epsilon` means the edges are collinear.
    pub fn from_edge_pair(
        first: &EdgeRef,
        second: &EdgeRef,
        point_tolerance: Tolerance,
        epsilon: f64,
    ) -> GeometryResult<Self> {
        let (v1, v2) = (first.start, first.end);
        let v3 = second
            .endpoints()
            .into_iter()
            .find(|p| !point_tolerance.points_equal(*p, v1) && !point_tolerance.points_equal(*p, v2))
            .ok_or_else(|| {
                GeometryError::DegenerateInput(
                    "could not define a valid plane from selected edges".into(),
                )
            })?;

        let normal = triangle_normal(v1, v2, v3);
        let length = normal.length();
        if length < epsilon {
            return Err(GeometryError::Collinear(length));
        }

        Ok(Self {
            point: v1,
            normal: normal / length,
        })
    }

    /// Signed distance from a point to the plane (positive on the normal side)
    pub fn signed_distance(&self, p: DVec3) -> f64 {
        (p - self.point).dot(self.normal)
    }

    /// Whether a point lies on the plane within `tolerance`
    pub fn contains_point(&self, p: DVec3, tolerance: f64) -> bool {
        self.signed_distance(p).abs() < tolerance
    }

    /// Whether both endpoints of an edge lie on the plane within `tolerance`
    pub fn contains_edge(&self, edge: &EdgeRef, tolerance: f64) -> bool {
        self.contains_point(edge.start, tolerance) && self.contains_point(edge.end, tolerance)
    }
}

/// Result of best-fit plane estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneFit {
    /// Unit normal, oriented away from the reference center when possible
    pub normal: DVec3,
    /// Mean of the input points
    pub centroid: DVec3,
    /// Cross-product magnitude of the winning triple (0 when none qualified)
    pub best_magnitude: f64,
}

impl PlaneFit {
    /// The fitted plane through the centroid
    pub fn plane(&self) -> Plane {
        Plane {
            point: self.centroid,
            normal: self.normal,
        }
    }
}

/// Estimate a plane normal and centroid from an unordered point set
///
/// With fewer than three points the result is the `(0,0,1)` normal at the
/// origin. When no triple has a cross product longer than 1e-6 the points
/// count as collinear and the normal also falls back to `(0,0,1)`.
///
/// The normal is flipped to point away from `reference_center` when the
/// centroid is offset from it by more than 1e-6. This orients normals
/// outward for convex shapes only.
pub fn estimate_normal_and_centroid(points: &[DVec3], reference_center: DVec3) -> PlaneFit {
    estimate_normal_and_centroid_with_epsilon(points, reference_center, NORMAL_EPSILON)
}

/// [`estimate_normal_and_centroid`] with a custom offset threshold for sign resolution
pub fn estimate_normal_and_centroid_with_epsilon(
    points: &[DVec3],
    reference_center: DVec3,
    epsilon: f64,
) -> PlaneFit {
    if points.len() < 3 {
        return PlaneFit {
            normal: DVec3::Z,
            centroid: DVec3::ZERO,
            best_magnitude: 0.0,
        };
    }

    let centroid = mean_point(points);
    let vectors: Vec<DVec3> = points.iter().map(|p| *p - centroid).collect();

    let mut best_normal: Option<DVec3> = None;
    let mut best_magnitude = 0.0;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            for k in (j + 1)..vectors.len() {
                let n = triangle_normal(vectors[i], vectors[j], vectors[k]);
                let magnitude = n.length();
                if magnitude > best_magnitude {
                    best_magnitude = magnitude;
                    best_normal = Some(n / magnitude);
                }
            }
        }
    }

    let mut normal = match best_normal.filter(|_| best_magnitude > epsilon) {
        Some(n) => n,
        None => {
            tracing::debug!("All {} points are collinear, using +Z normal", points.len());
            DVec3::Z
        }
    };

    let delta = centroid - reference_center;
    let delta_length = delta.length();
    if delta_length > epsilon && (delta / delta_length).dot(normal) < 0.0 {
        normal = -normal;
    }

    PlaneFit {
        normal,
        centroid,
        best_magnitude,
    }
}
