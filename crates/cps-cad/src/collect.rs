//! Edge data collection
//!
//! Snapshots every edge of an object once so that later operations work on
//! stable data and can map edges back to their `EdgeN` names.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use cps_core::{EdgeRef, mean_point};

use crate::host::{ShapeFace, ShapeSnapshot};
use crate::selection::SubElement;

/// One collected edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedEdge {
    /// Host name (`Edge1`, `Edge2`, ...)
    pub name: String,
    /// 0-based index in the shape's edge list
    pub index: usize,
    /// Vertex points in host order
    pub vertices: Vec<DVec3>,
    /// Snapshot of the edge, present only when it is valid
    pub edge: Option<EdgeRef>,
}

impl CollectedEdge {
    /// An edge is valid when it has exactly two vertices
    pub fn is_valid(&self) -> bool {
        self.edge.is_some()
    }
}

/// Collected edge data of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeCollection {
    /// Internal object name
    pub object: String,
    /// User-visible label
    pub label: String,
    /// All edges in shape order
    pub edges: Vec<CollectedEdge>,
    /// All faces in shape order
    pub faces: Vec<ShapeFace>,
    /// Mean of the vertices of all valid edges
    pub mass_center: DVec3,
}

impl EdgeCollection {
    /// Collect every edge of a shape
    pub fn collect(shape: &ShapeSnapshot) -> Self {
        let edges: Vec<CollectedEdge> = shape
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| CollectedEdge {
                name: SubElement::edge(index).name(),
                index,
                vertices: edge.vertices.clone(),
                edge: (edge.vertex_count() == 2)
                    .then(|| edge.edge_ref())
                    .flatten(),
            })
            .collect();

        let valid_points: Vec<DVec3> = edges
            .iter()
            .filter(|e| e.is_valid())
            .flat_map(|e| e.vertices.iter().copied())
            .collect();

        Self {
            object: shape.object.clone(),
            label: shape.label.clone(),
            mass_center: mean_point(&valid_points),
            edges,
            faces: shape.faces.clone(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.edges.len()
    }

    pub fn valid_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_valid()).count()
    }

    pub fn degenerate_count(&self) -> usize {
        self.total_count() - self.valid_count()
    }

    /// Whether cleaning degenerate edges is recommended
    pub fn needs_cleaning(&self) -> bool {
        self.degenerate_count() > 0
    }

    /// Snapshots of all valid edges, in shape order
    pub fn valid_edges(&self) -> Vec<EdgeRef> {
        self.edges.iter().filter_map(|e| e.edge).collect()
    }

    /// Look up an edge by its `EdgeN` name
    pub fn by_name(&self, name: &str) -> Option<&CollectedEdge> {
        let sub: SubElement = name.parse().ok()?;
        self.edges.get(sub.index).filter(|e| e.name == name)
    }

    /// Name of the collected edge sharing `edge`'s underlying curve
    pub fn name_of(&self, edge: &EdgeRef) -> Option<&str> {
        self.edges
            .iter()
            .find(|e| e.edge.is_some_and(|own| own.is_same(edge)))
            .map(|e| e.name.as_str())
    }

    /// Indices of faces whose edges are all valid
    pub fn clean_faces(&self) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, face)| {
                face.edges
                    .iter()
                    .all(|&i| self.edges.get(i).is_some_and(|e| e.is_valid()))
            })
            .map(|(i, _)| i)
            .collect()
    }
}
