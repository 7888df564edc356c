//! Sketch Constraints
//!
//! Constraints emitted for construction geometry: a block per segment and
//! coincidences between shared endpoints.

use serde::{Deserialize, Serialize};

/// Endpoint slot of a line segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointPos {
    /// Start point
    Start,
    /// End point
    End,
}

impl PointPos {
    /// Host vertex id of this slot (1 = start, 2 = end)
    pub fn vertex_id(&self) -> u8 {
        match self {
            PointPos::Start => 1,
            PointPos::End => 2,
        }
    }
}

/// A reference to one endpoint of one sketch geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexRef {
    /// Geometry index
    pub geometry: usize,
    /// Endpoint slot
    pub pos: PointPos,
}

impl VertexRef {
    /// Create a vertex reference
    pub fn new(geometry: usize, pos: PointPos) -> Self {
        Self { geometry, pos }
    }
}

/// A constraint between sketch geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SketchConstraint {
    /// Geometry is fully fixed and cannot be moved by the solver
    Block {
        /// Geometry to fix
        geometry: usize,
    },

    /// Two endpoints are at the same location
    Coincident {
        /// First endpoint
        first: VertexRef,
        /// Second endpoint
        second: VertexRef,
    },
}

impl SketchConstraint {
    /// Get the type name of this constraint
    pub fn type_name(&self) -> &'static str {
        match self {
            SketchConstraint::Block { .. } => "Block",
            SketchConstraint::Coincident { .. } => "Coincident",
        }
    }

    /// Get all geometry indices referenced by this constraint
    pub fn referenced_geometry(&self) -> Vec<usize> {
        match self {
            SketchConstraint::Block { geometry } => vec![*geometry],
            SketchConstraint::Coincident { first, second } => {
                vec![first.geometry, second.geometry]
            }
        }
    }

    /// Check if this constraint references a specific geometry
    pub fn references_geometry(&self, geometry: usize) -> bool {
        self.referenced_geometry().contains(&geometry)
    }

    /// Same constraint with every geometry index passed through `map`
    pub fn remap(&self, map: impl Fn(usize) -> usize) -> Self {
        match *self {
            SketchConstraint::Block { geometry } => SketchConstraint::Block {
                geometry: map(geometry),
            },
            SketchConstraint::Coincident { first, second } => SketchConstraint::Coincident {
                first: VertexRef::new(map(first.geometry), first.pos),
                second: VertexRef::new(map(second.geometry), second.pos),
            },
        }
    }

    // ============== Factory Methods ==============

    /// Create a block constraint
    pub fn block(geometry: usize) -> Self {
        SketchConstraint::Block { geometry }
    }

    /// Create a coincident constraint
    pub fn coincident(first: VertexRef, second: VertexRef) -> Self {
        SketchConstraint::Coincident { first, second }
    }
}
