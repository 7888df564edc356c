//! Straight edge snapshots

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the host curve underlying an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveId(pub Uuid);

impl CurveId {
    /// Create a fresh curve identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CurveId {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of a host-owned straight edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Identity of the underlying curve
    pub curve: CurveId,
    /// Start point (global coordinates)
    pub start: DVec3,
    /// End point (global coordinates)
    pub end: DVec3,
}

impl EdgeRef {
    /// Create an edge snapshot
    pub fn new(curve: CurveId, start: DVec3, end: DVec3) -> Self {
        Self { curve, start, end }
    }

    /// Create an edge snapshot with a fresh curve identity
    pub fn segment(start: DVec3, end: DVec3) -> Self {
        Self::new(CurveId::new(), start, end)
    }

    /// Both endpoints, start first
    pub fn endpoints(&self) -> [DVec3; 2] {
        [self.start, self.end]
    }

    /// Distance between the endpoints
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Whether both snapshots come from the same underlying curve
    pub fn is_same(&self, other: &EdgeRef) -> bool {
        self.curve == other.curve
    }
}
