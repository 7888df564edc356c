//! Coplanarity classification of straight edges

use crate::edge::EdgeRef;
use crate::plane::Plane;

/// Edges whose endpoints both lie on `plane` within `tolerance`, in input order
pub fn classify(edges: &[EdgeRef], plane: &Plane, tolerance: f64) -> Vec<EdgeRef> {
    edges
        .iter()
        .filter(|edge| plane.contains_edge(edge, tolerance))
        .copied()
        .collect()
}
