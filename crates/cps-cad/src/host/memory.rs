//! In-memory host document
//!
//! A complete [`HostDocument`] kept in plain Rust data. Transactions snapshot
//! the whole object table on open; aborting restores the snapshot.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use cps_core::Placement;

use super::traits::{
    Attachment, HostDocument, HostError, HostResult, MapMode, ObjectId, ObjectKind,
    PlacementChoice, PlacementPrompt, ShapeEdge, ShapeFace, ShapeSnapshot,
};
use crate::sketch::SketchConstraint;

/// A line segment stored in a sketch, in sketch-plane coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    pub start: DVec2,
    pub end: DVec2,
    pub construction: bool,
}

/// Geometry and constraints of a sketch object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SketchData {
    /// Line segments, by geometry index
    pub lines: Vec<SketchLine>,
    /// Constraints, by constraint index
    pub constraints: Vec<SketchConstraint>,
    /// Hidden flag per constraint
    pub hidden: Vec<bool>,
}

impl SketchData {
    /// Number of constraints of the given type name
    pub fn count_constraints(&self, type_name: &str) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.type_name() == type_name)
            .count()
    }
}

#[derive(Debug, Clone)]
struct MemoryObject {
    id: ObjectId,
    name: String,
    label: String,
    kind: ObjectKind,
    visible: bool,
    placement: Placement,
    attachment: Option<Attachment>,
    parent: Option<ObjectId>,
    sketch: Option<SketchData>,
    shape: Option<ShapeSnapshot>,
    origin_xy: Option<ObjectId>,
}

impl MemoryObject {
    fn new(kind: ObjectKind, name: String) -> Self {
        Self {
            id: ObjectId::new(),
            label: name.clone(),
            name,
            kind,
            visible: true,
            placement: Placement::IDENTITY,
            attachment: None,
            parent: None,
            sketch: (kind == ObjectKind::Sketch).then(SketchData::default),
            shape: None,
            origin_xy: None,
        }
    }
}

/// How a transaction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    Committed,
    Aborted,
}

/// A finished transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub name: String,
    pub outcome: TransactionOutcome,
}

/// In-memory implementation of [`HostDocument`]
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    name: String,
    objects: Vec<MemoryObject>,
    /// Open transaction name and the object table at open time
    open: Option<(String, Vec<MemoryObject>)>,
    history: Vec<TransactionRecord>,
    recomputes: usize,
    reject_coincident: bool,
    reject_hide: bool,
    fail_add_line: bool,
    fail_remove: bool,
}

impl MemoryDocument {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Reject every coincident constraint
    pub fn with_rejected_coincidences(mut self) -> Self {
        self.reject_coincident = true;
        self
    }

    /// Fail every attempt to hide a constraint
    pub fn with_hide_failures(mut self) -> Self {
        self.reject_hide = true;
        self
    }

    /// Fail every attempt to add a line segment
    pub fn with_line_failures(mut self) -> Self {
        self.fail_add_line = true;
        self
    }

    /// Fail every attempt to remove an object
    pub fn with_remove_failures(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    // ========== Setup ==========

    /// Insert a shape-carrying feature outside of any transaction
    pub fn insert_shape(
        &mut self,
        name: &str,
        label: &str,
        edges: Vec<ShapeEdge>,
        faces: Vec<ShapeFace>,
    ) -> ObjectId {
        let name = self.unique_name(name);
        let mut object = MemoryObject::new(ObjectKind::PartFeature, name.clone());
        object.label = label.to_string();
        object.shape = Some(ShapeSnapshot {
            object: name,
            label: label.to_string(),
            edges,
            faces,
        });
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Insert a body (with its XY origin plane) outside of any transaction
    pub fn insert_body(&mut self, name: &str) -> ObjectId {
        self.create_object(ObjectKind::Body, name)
    }

    // ========== Inspection ==========

    /// Number of objects in the document
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Ids of all objects of `kind`, in creation order
    pub fn objects_of_kind(&self, kind: ObjectKind) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.id)
            .collect()
    }

    /// Sketch contents of a sketch object
    pub fn sketch(&self, id: ObjectId) -> Option<&SketchData> {
        self.get(id).ok()?.sketch.as_ref()
    }

    /// Own placement of an object
    pub fn placement(&self, id: ObjectId) -> Option<Placement> {
        self.get(id).ok().map(|o| o.placement)
    }

    /// Attachment of an object
    pub fn attachment(&self, id: ObjectId) -> Option<Attachment> {
        self.get(id).ok()?.attachment
    }

    /// Container of an object
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id).ok()?.parent
    }

    /// User-visible label of an object
    pub fn label(&self, id: ObjectId) -> Option<&str> {
        self.get(id).ok().map(|o| o.label.as_str())
    }

    /// Visibility of an object
    pub fn is_visible(&self, id: ObjectId) -> Option<bool> {
        self.get(id).ok().map(|o| o.visible)
    }

    /// Finished transactions, oldest first
    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.open.is_some()
    }

    /// Number of recomputes requested
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    // ========== Internals ==========

    fn get(&self, id: ObjectId) -> HostResult<&MemoryObject> {
        self.objects
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| HostError::ObjectNotFound(format!("{:?}", id.0)))
    }

    fn get_mut(&mut self, id: ObjectId) -> HostResult<&mut MemoryObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| HostError::ObjectNotFound(format!("{:?}", id.0)))
    }

    fn sketch_mut(&mut self, id: ObjectId) -> HostResult<&mut SketchData> {
        let object = self.get_mut(id)?;
        let name = object.name.clone();
        object.sketch.as_mut().ok_or(HostError::WrongKind {
            name,
            expected: ObjectKind::Sketch.type_name(),
        })
    }

    fn require_transaction(&self) -> HostResult<()> {
        if self.open.is_some() {
            Ok(())
        } else {
            Err(HostError::NoTransaction)
        }
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |n: &str| self.objects.iter().any(|o| o.name == n);
        if !taken(base) {
            return base.to_string();
        }
        let mut i = 1;
        loop {
            let candidate = format!("{base}{i:03}");
            if !taken(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    fn create_object(&mut self, kind: ObjectKind, name: &str) -> ObjectId {
        let name = self.unique_name(name);
        let object = MemoryObject::new(kind, name);
        let id = object.id;
        self.objects.push(object);

        if kind == ObjectKind::Body {
            let plane_name = self.unique_name("XY_Plane");
            let mut plane = MemoryObject::new(ObjectKind::OriginFeature, plane_name);
            plane.parent = Some(id);
            let plane_id = plane.id;
            self.objects.push(plane);
            if let Some(body) = self.objects.iter_mut().find(|o| o.id == id) {
                body.origin_xy = Some(plane_id);
            }
        }
        id
    }

    fn resolve_placement(&self, id: ObjectId, depth: usize) -> HostResult<Placement> {
        if depth > self.objects.len() {
            return Err(HostError::OperationFailed(
                "cyclic placement dependency".into(),
            ));
        }
        let object = self.get(id)?;
        if let Some(attachment) = object
            .attachment
            .filter(|a| a.mode == MapMode::ObjectXY)
        {
            let support = self.resolve_placement(attachment.support, depth + 1)?;
            return Ok(support.multiply(&attachment.offset));
        }
        match object.parent {
            Some(parent) => Ok(self
                .resolve_placement(parent, depth + 1)?
                .multiply(&object.placement)),
            None => Ok(object.placement),
        }
    }
}

impl HostDocument for MemoryDocument {
    fn name(&self) -> &str {
        &self.name
    }

    // ========== Transactions ==========

    fn open_transaction(&mut self, name: &str) -> HostResult<()> {
        if let Some((open, _)) = &self.open {
            return Err(HostError::TransactionOpen(open.clone()));
        }
        debug!("Opening transaction '{}'", name);
        self.open = Some((name.to_string(), self.objects.clone()));
        Ok(())
    }

    fn commit_transaction(&mut self) -> HostResult<()> {
        let (name, _) = self.open.take().ok_or(HostError::NoTransaction)?;
        debug!("Committing transaction '{}'", name);
        self.history.push(TransactionRecord {
            name,
            outcome: TransactionOutcome::Committed,
        });
        Ok(())
    }

    fn abort_transaction(&mut self) {
        if let Some((name, snapshot)) = self.open.take() {
            debug!("Aborting transaction '{}'", name);
            self.objects = snapshot;
            self.history.push(TransactionRecord {
                name,
                outcome: TransactionOutcome::Aborted,
            });
        }
    }

    // ========== Objects ==========

    fn add_object(&mut self, kind: ObjectKind, name: &str) -> HostResult<ObjectId> {
        self.require_transaction()?;
        Ok(self.create_object(kind, name))
    }

    fn remove_object(&mut self, id: ObjectId) -> HostResult<()> {
        self.require_transaction()?;
        self.get(id)?;
        if self.fail_remove {
            return Err(HostError::OperationFailed(format!("cannot remove {id:?}")));
        }
        self.objects.retain(|o| o.id != id && o.parent != Some(id));
        Ok(())
    }

    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().find(|o| o.name == name).map(|o| o.id)
    }

    fn object_name(&self, id: ObjectId) -> Option<String> {
        self.get(id).ok().map(|o| o.name.clone())
    }

    fn recompute(&mut self) -> HostResult<()> {
        self.recomputes += 1;
        Ok(())
    }

    fn set_visibility(&mut self, id: ObjectId, visible: bool) -> HostResult<()> {
        self.require_transaction()?;
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    fn shape(&self, object: &str) -> HostResult<ShapeSnapshot> {
        let found = self
            .objects
            .iter()
            .find(|o| o.name == object)
            .ok_or_else(|| HostError::ObjectNotFound(object.to_string()))?;
        found
            .shape
            .clone()
            .ok_or_else(|| HostError::OperationFailed(format!("{object} has no shape")))
    }

    fn add_face_compound(
        &mut self,
        source: &str,
        faces: &[usize],
        name: &str,
    ) -> HostResult<ObjectId> {
        self.require_transaction()?;
        let shape = self.shape(source)?;

        let mut edges: Vec<ShapeEdge> = Vec::new();
        let mut remap: Vec<Option<usize>> = vec![None; shape.edges.len()];
        let mut kept_faces = Vec::with_capacity(faces.len());
        for &face_index in faces {
            let face = shape.faces.get(face_index).ok_or_else(|| {
                HostError::InvalidGeometry(format!("{source} has no face {}", face_index + 1))
            })?;
            let mut face_edges = Vec::with_capacity(face.edges.len());
            for &edge_index in &face.edges {
                let edge = shape.edges.get(edge_index).ok_or_else(|| {
                    HostError::InvalidGeometry(format!("{source} has no edge {}", edge_index + 1))
                })?;
                let new_index = match remap[edge_index] {
                    Some(i) => i,
                    None => {
                        edges.push(edge.clone());
                        remap[edge_index] = Some(edges.len() - 1);
                        edges.len() - 1
                    }
                };
                face_edges.push(new_index);
            }
            kept_faces.push(ShapeFace {
                axis: face.axis,
                center_of_mass: face.center_of_mass,
                edges: face_edges,
            });
        }

        let id = self.create_object(ObjectKind::PartFeature, name);
        let object = self.get_mut(id)?;
        object.label = name.to_string();
        object.shape = Some(ShapeSnapshot {
            object: object.name.clone(),
            label: name.to_string(),
            edges,
            faces: kept_faces,
        });
        Ok(id)
    }

    // ========== Placement ==========

    fn set_placement(&mut self, id: ObjectId, placement: Placement) -> HostResult<()> {
        self.require_transaction()?;
        self.get_mut(id)?.placement = placement;
        Ok(())
    }

    fn set_attachment(&mut self, id: ObjectId, attachment: Attachment) -> HostResult<()> {
        self.require_transaction()?;
        self.get(attachment.support)?;
        self.get_mut(id)?.attachment = Some(attachment);
        Ok(())
    }

    fn global_placement(&self, id: ObjectId) -> HostResult<Placement> {
        self.resolve_placement(id, 0)
    }

    // ========== Sketch Geometry ==========

    fn add_line_segment(
        &mut self,
        sketch: ObjectId,
        start: DVec3,
        end: DVec3,
    ) -> HostResult<usize> {
        self.require_transaction()?;
        if self.fail_add_line {
            return Err(HostError::OperationFailed("line segment refused".into()));
        }
        let data = self.sketch_mut(sketch)?;
        data.lines.push(SketchLine {
            start: start.truncate(),
            end: end.truncate(),
            construction: false,
        });
        Ok(data.lines.len() - 1)
    }

    fn set_construction(
        &mut self,
        sketch: ObjectId,
        geometry: usize,
        construction: bool,
    ) -> HostResult<()> {
        self.require_transaction()?;
        let data = self.sketch_mut(sketch)?;
        let line = data
            .lines
            .get_mut(geometry)
            .ok_or_else(|| HostError::InvalidGeometry(format!("no geometry {geometry}")))?;
        line.construction = construction;
        Ok(())
    }

    fn add_constraint(
        &mut self,
        sketch: ObjectId,
        constraint: SketchConstraint,
    ) -> HostResult<usize> {
        self.require_transaction()?;
        let reject_coincident = self.reject_coincident;
        let data = self.sketch_mut(sketch)?;
        if let Some(missing) = constraint
            .referenced_geometry()
            .into_iter()
            .find(|&g| g >= data.lines.len())
        {
            return Err(HostError::InvalidGeometry(format!(
                "{} references missing geometry {}",
                constraint.type_name(),
                missing
            )));
        }
        if reject_coincident && matches!(constraint, SketchConstraint::Coincident { .. }) {
            return Err(HostError::ConstraintRejected(format!("{constraint:?}")));
        }
        data.constraints.push(constraint);
        data.hidden.push(false);
        Ok(data.constraints.len() - 1)
    }

    fn set_constraint_hidden(
        &mut self,
        sketch: ObjectId,
        constraint: usize,
        hidden: bool,
    ) -> HostResult<()> {
        self.require_transaction()?;
        if self.reject_hide {
            return Err(HostError::OperationFailed("virtual space unavailable".into()));
        }
        let data = self.sketch_mut(sketch)?;
        let flag = data
            .hidden
            .get_mut(constraint)
            .ok_or_else(|| HostError::InvalidGeometry(format!("no constraint {constraint}")))?;
        *flag = hidden;
        Ok(())
    }

    // ========== Bodies ==========

    fn list_bodies(&self) -> Vec<String> {
        self.objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Body)
            .map(|o| o.name.clone())
            .collect()
    }

    fn add_to_body(&mut self, body: ObjectId, object: ObjectId) -> HostResult<()> {
        self.require_transaction()?;
        let container = self.get(body)?;
        if container.kind != ObjectKind::Body {
            return Err(HostError::WrongKind {
                name: container.name.clone(),
                expected: ObjectKind::Body.type_name(),
            });
        }
        self.get_mut(object)?.parent = Some(body);
        Ok(())
    }

    fn body_origin_xy(&self, body: ObjectId) -> HostResult<ObjectId> {
        let container = self.get(body)?;
        container.origin_xy.ok_or_else(|| HostError::WrongKind {
            name: container.name.clone(),
            expected: ObjectKind::Body.type_name(),
        })
    }
}

/// A [`PlacementPrompt`] that gives a fixed answer and records what it was offered
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answer: Option<PlacementChoice>,
    offered: Vec<PlacementChoice>,
    calls: usize,
}

impl ScriptedPrompt {
    /// Answer with `choice`, even if it is not among the offered options
    pub fn answering(choice: PlacementChoice) -> Self {
        Self {
            answer: Some(choice),
            ..Default::default()
        }
    }

    pub fn standalone() -> Self {
        Self::answering(PlacementChoice::Standalone)
    }

    pub fn new_body() -> Self {
        Self::answering(PlacementChoice::NewBody)
    }

    pub fn existing_body(name: &str) -> Self {
        Self::answering(PlacementChoice::ExistingBody(name.to_string()))
    }

    /// Cancel the dialog
    pub fn cancel() -> Self {
        Self::default()
    }

    /// Options offered by the most recent call
    pub fn offered(&self) -> &[PlacementChoice] {
        &self.offered
    }

    /// Number of times the prompt was shown
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl PlacementPrompt for ScriptedPrompt {
    fn choose(&mut self, options: &[PlacementChoice]) -> Option<PlacementChoice> {
        self.calls += 1;
        self.offered = options.to_vec();
        self.answer.clone()
    }
}
