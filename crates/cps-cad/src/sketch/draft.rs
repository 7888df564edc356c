//! Sketch drafts
//!
//! A draft is the complete set of segments and constraints for one sketch,
//! computed from edge snapshots before any host geometry is created.

use glam::DVec3;
use tracing::warn;

use cps_core::{EdgeRef, Placement, Tolerance};

use super::constraint::{PointPos, SketchConstraint, VertexRef};

/// One construction line, in sketch-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftSegment {
    /// Source edge
    pub edge: EdgeRef,
    /// Local start point
    pub start: DVec3,
    /// Local end point
    pub end: DVec3,
}

/// Endpoints that share one location
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGroup {
    /// Location of the first member
    pub representative: DVec3,
    /// Members, in insertion order
    pub members: Vec<VertexRef>,
}

impl VertexGroup {
    /// Coincidences tying every later member to the first one
    pub fn coincidences(&self) -> impl Iterator<Item = SketchConstraint> + '_ {
        let first = self.members.first().copied();
        self.members
            .iter()
            .skip(1)
            .filter_map(move |member| first.map(|f| SketchConstraint::coincident(f, *member)))
    }
}

/// Proximity grouping of segment endpoints
///
/// A point joins the first group whose representative is within tolerance;
/// otherwise it starts a new group.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGroups {
    tolerance: Tolerance,
    groups: Vec<VertexGroup>,
}

impl VertexGroups {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            groups: Vec::new(),
        }
    }

    /// Register an endpoint, returning the index of its group
    pub fn insert(&mut self, point: DVec3, vertex: VertexRef) -> usize {
        if let Some(index) = self
            .groups
            .iter()
            .position(|g| self.tolerance.points_equal(g.representative, point))
        {
            self.groups[index].members.push(vertex);
            return index;
        }
        self.groups.push(VertexGroup {
            representative: point,
            members: vec![vertex],
        });
        self.groups.len() - 1
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VertexGroup> {
        self.groups.iter()
    }

    /// All coincidences, group by group
    pub fn coincidences(&self) -> Vec<SketchConstraint> {
        self.groups.iter().flat_map(|g| g.coincidences()).collect()
    }
}

/// Segments, block constraints, and vertex groups for one sketch
#[derive(Debug, Clone, PartialEq)]
pub struct SketchDraft {
    /// Segments, by draft geometry index
    pub segments: Vec<DraftSegment>,
    /// One block constraint per segment
    pub blocks: Vec<SketchConstraint>,
    /// Endpoint groups over global coordinates
    pub groups: VertexGroups,
    /// Edges skipped for being shorter than the degenerate tolerance
    pub skipped_degenerate: usize,
}

impl SketchDraft {
    /// Build a draft from global edges
    ///
    /// `to_local` maps global points into the sketch frame. Edges shorter
    /// than `degenerate_tolerance` are skipped and counted.
    pub fn build(
        edges: &[EdgeRef],
        to_local: &Placement,
        degenerate_tolerance: f64,
        merge: Tolerance,
    ) -> Self {
        let mut draft = Self {
            segments: Vec::with_capacity(edges.len()),
            blocks: Vec::with_capacity(edges.len()),
            groups: VertexGroups::new(merge),
            skipped_degenerate: 0,
        };

        for (i, edge) in edges.iter().enumerate() {
            let length = edge.length();
            if length < degenerate_tolerance {
                warn!("Skipping degenerate edge {} (length {:.3e})", i, length);
                draft.skipped_degenerate += 1;
                continue;
            }

            let index = draft.segments.len();
            draft.segments.push(DraftSegment {
                edge: *edge,
                start: to_local.mult_vec(edge.start),
                end: to_local.mult_vec(edge.end),
            });
            draft.blocks.push(SketchConstraint::block(index));
            draft
                .groups
                .insert(edge.start, VertexRef::new(index, PointPos::Start));
            draft
                .groups
                .insert(edge.end, VertexRef::new(index, PointPos::End));
        }

        draft
    }

    /// Whether no segment survived
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Coincidence constraints over draft geometry indices
    pub fn coincidences(&self) -> Vec<SketchConstraint> {
        self.groups.coincidences()
    }
}
