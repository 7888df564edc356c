//! Host document trait definitions
//!
//! These traits define the boundary to the modeling application that owns
//! the document: transactions, object creation, sketch geometry and
//! constraints, bodies, and the interactive placement prompt.

use cps_core::{CurveId, EdgeRef, Placement};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::sketch::SketchConstraint;

/// Unique identifier for a document object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Create a fresh object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kinds of document objects this crate creates or inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A 2D sketch
    Sketch,
    /// A feature container with its own origin
    Body,
    /// A plain shape-carrying feature
    PartFeature,
    /// A datum of a body origin (plane or axis)
    OriginFeature,
}

impl ObjectKind {
    /// Host type name of this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Sketch => "Sketcher::SketchObject",
            ObjectKind::Body => "PartDesign::Body",
            ObjectKind::PartFeature => "Part::Feature",
            ObjectKind::OriginFeature => "App::Plane",
        }
    }
}

/// Attachment mapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapMode {
    /// Not attached; the object's own placement applies
    #[default]
    Deactivated,
    /// Aligned with the support's XY plane
    ObjectXY,
}

/// Attachment of an object to a support, with an extra local offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Supporting object (e.g. a body's XY origin plane)
    pub support: ObjectId,
    /// Mapping mode
    pub mode: MapMode,
    /// Offset applied on top of the mapped frame
    pub offset: Placement,
}

impl Attachment {
    /// XY-plane attachment to `support` with `offset`
    pub fn object_xy(support: ObjectId, offset: Placement) -> Self {
        Self {
            support,
            mode: MapMode::ObjectXY,
            offset,
        }
    }
}

/// An edge of a host shape, as captured at snapshot time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeEdge {
    /// Identity of the underlying curve
    pub curve: CurveId,
    /// Vertex points, in host order
    pub vertices: Vec<DVec3>,
}

impl ShapeEdge {
    /// Create a straight edge between two points
    pub fn line(start: DVec3, end: DVec3) -> Self {
        Self {
            curve: CurveId::new(),
            vertices: vec![start, end],
        }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Snapshot from the first to the last vertex, if there is one
    pub fn edge_ref(&self) -> Option<EdgeRef> {
        let start = *self.vertices.first()?;
        let end = *self.vertices.last()?;
        Some(EdgeRef::new(self.curve, start, end))
    }
}

/// A planar face of a host shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeFace {
    /// Surface axis (normal)
    pub axis: DVec3,
    /// Center of mass
    pub center_of_mass: DVec3,
    /// Indices into the owning shape's edge list
    pub edges: Vec<usize>,
}

/// Immutable snapshot of an object's shape topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    /// Internal object name
    pub object: String,
    /// User-visible label
    pub label: String,
    /// All edges, in shape order (`Edge1` is index 0)
    pub edges: Vec<ShapeEdge>,
    /// All faces, in shape order (`Face1` is index 0)
    pub faces: Vec<ShapeFace>,
}

/// Error type for host document operations
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Object {name} is not a {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("No open transaction")]
    NoTransaction,

    #[error("Transaction already open: {0}")]
    TransactionOpen(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Constraint rejected: {0}")]
    ConstraintRejected(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Where a synthesized sketch should be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementChoice {
    /// A free-standing sketch carrying the placement directly
    Standalone,
    /// A new body, with the sketch attached to its origin
    NewBody,
    /// An existing body (by object name)
    ExistingBody(String),
}

impl PlacementChoice {
    /// Label shown to the user
    pub fn label(&self) -> String {
        match self {
            PlacementChoice::Standalone => "<Standalone (Part Workbench)>".to_string(),
            PlacementChoice::NewBody => "<Create New Body (PartDesign)>".to_string(),
            PlacementChoice::ExistingBody(name) => name.clone(),
        }
    }
}

/// Synchronous decision provider for the sketch destination
///
/// Returning `None` cancels the operation.
pub trait PlacementPrompt {
    /// Choose one of `options`
    fn choose(&mut self, options: &[PlacementChoice]) -> Option<PlacementChoice>;
}

impl<F> PlacementPrompt for F
where
    F: FnMut(&[PlacementChoice]) -> Option<PlacementChoice>,
{
    fn choose(&mut self, options: &[PlacementChoice]) -> Option<PlacementChoice> {
        self(options)
    }
}

/// The host document
///
/// Implementations wrap the modeling application's document. Every mutation
/// made by this crate happens between `open_transaction` and either
/// `commit_transaction` or `abort_transaction`.
pub trait HostDocument {
    /// Get the name of this document
    fn name(&self) -> &str;

    // ========== Transactions ==========

    /// Open an undoable transaction
    fn open_transaction(&mut self, name: &str) -> HostResult<()>;

    /// Commit the open transaction
    fn commit_transaction(&mut self) -> HostResult<()>;

    /// Abort the open transaction, discarding all of its changes
    fn abort_transaction(&mut self);

    // ========== Objects ==========

    /// Create an object of `kind`; the host may alter `name` to keep it unique
    fn add_object(&mut self, kind: ObjectKind, name: &str) -> HostResult<ObjectId>;

    /// Remove an object
    fn remove_object(&mut self, id: ObjectId) -> HostResult<()>;

    /// Look up an object by its internal name
    fn find_object(&self, name: &str) -> Option<ObjectId>;

    /// Internal name of an object
    fn object_name(&self, id: ObjectId) -> Option<String>;

    /// Recompute the document
    fn recompute(&mut self) -> HostResult<()>;

    /// Show or hide an object
    fn set_visibility(&mut self, id: ObjectId, visible: bool) -> HostResult<()>;

    /// Snapshot the shape of an object
    fn shape(&self, object: &str) -> HostResult<ShapeSnapshot>;

    /// Create a compound feature from a subset of another object's faces
    fn add_face_compound(
        &mut self,
        source: &str,
        faces: &[usize],
        name: &str,
    ) -> HostResult<ObjectId>;

    // ========== Placement ==========

    /// Set an object's own placement
    fn set_placement(&mut self, id: ObjectId, placement: Placement) -> HostResult<()>;

    /// Attach an object to a support
    fn set_attachment(&mut self, id: ObjectId, attachment: Attachment) -> HostResult<()>;

    /// Resolved global placement, accounting for parents and attachment
    fn global_placement(&self, id: ObjectId) -> HostResult<Placement>;

    // ========== Sketch Geometry ==========

    /// Append a line segment given in the sketch's local coordinates
    ///
    /// Returns the geometry index.
    fn add_line_segment(&mut self, sketch: ObjectId, start: DVec3, end: DVec3)
    -> HostResult<usize>;

    /// Mark geometry as construction-only
    fn set_construction(
        &mut self,
        sketch: ObjectId,
        geometry: usize,
        construction: bool,
    ) -> HostResult<()>;

    /// Add a constraint, returning its index
    fn add_constraint(
        &mut self,
        sketch: ObjectId,
        constraint: SketchConstraint,
    ) -> HostResult<usize>;

    /// Hide or show a constraint in the sketch UI
    fn set_constraint_hidden(
        &mut self,
        sketch: ObjectId,
        constraint: usize,
        hidden: bool,
    ) -> HostResult<()>;

    // ========== Bodies ==========

    /// Names of all bodies in the document
    fn list_bodies(&self) -> Vec<String>;

    /// Move `object` into `body`
    fn add_to_body(&mut self, body: ObjectId, object: ObjectId) -> HostResult<()>;

    /// The XY plane of a body's origin
    fn body_origin_xy(&self, body: ObjectId) -> HostResult<ObjectId>;
}
