//! Geometry core for coplanar sketches
//!
//! This crate provides:
//! - Tolerance-based point comparison and vertex deduplication
//! - Best-fit plane estimation from unordered point sets
//! - Placement (rigid frame) construction from a plane normal
//! - Coplanarity classification of straight edges

pub mod coplanar;
pub mod edge;
pub mod geometry;
pub mod placement;
pub mod plane;
pub mod tolerance;

use thiserror::Error;

// Re-exports for convenience
pub use coplanar::classify;
pub use edge::{CurveId, EdgeRef};
pub use geometry::{dedup_points, mean_point};
pub use placement::{Placement, build_placement, build_placement_with_epsilon};
pub use plane::{
    Plane, PlaneFit, estimate_normal_and_centroid, estimate_normal_and_centroid_with_epsilon,
};
pub use tolerance::Tolerance;

/// Geometry-related errors
#[derive(Debug, Clone, Error)]
pub enum GeometryError {
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Edges are collinear; cannot define plane (normal length {0:.3e})")]
    Collinear(f64),
}

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;
