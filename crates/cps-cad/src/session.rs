//! Coplanar sketch session
//!
//! Holds the collected edge data and a user-facing message log, and
//! implements the user operations: collect, select coplanar edges, create a
//! sketch from the selection, and clean degenerate edges.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use cps_core::{
    EdgeRef, GeometryError, Plane, Placement, build_placement_with_epsilon, classify,
    dedup_points, estimate_normal_and_centroid_with_epsilon,
};

use crate::collect::EdgeCollection;
use crate::config::SketchConfig;
use crate::host::{HostDocument, ObjectId, PlacementPrompt};
use crate::selection::{Selection, SelectionItem, SubElement, SubElementKind, SubObject};
use crate::sketch::{SketchError, SketchResult, SketchSynthesizer, SynthesisReport};

/// Transaction name used for cleaning
pub const CLEAN_TRANSACTION_NAME: &str = "Clean Degenerate Edges";

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Info,
    Step,
    Success,
    Warning,
    Error,
}

/// A user-facing log message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Ordered message log, mirrored to `tracing`
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message
    pub fn push(&mut self, level: MessageLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            MessageLevel::Info | MessageLevel::Step | MessageLevel::Success => info!("{}", text),
            MessageLevel::Warning => warn!("{}", text),
            MessageLevel::Error => error!("{}", text),
        }
        self.messages.push(Message { level, text });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Info, text);
    }

    pub fn step(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Step, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Error, text);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages of one level
    pub fn of_level(&self, level: MessageLevel) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.level == level)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Counts from an edge collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectSummary {
    pub total: usize,
    pub valid: usize,
    pub degenerate: usize,
}

/// Result of cleaning degenerate edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// The cleaned compound object
    pub object: ObjectId,
    /// Its internal name
    pub name: String,
    pub faces_kept: usize,
    pub faces_removed: usize,
    /// Edge count of the cleaned object
    pub edges_after: usize,
}

/// State shared by the coplanar sketch operations
#[derive(Debug, Clone, Default)]
pub struct CoplanarSession {
    config: SketchConfig,
    collection: Option<EdgeCollection>,
    log: MessageLog,
}

impl CoplanarSession {
    /// Create a session with the given configuration
    pub fn new(config: SketchConfig) -> Self {
        Self {
            config,
            collection: None,
            log: MessageLog::new(),
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Collected edge data, if any
    pub fn collection(&self) -> Option<&EdgeCollection> {
        self.collection.as_ref()
    }

    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    pub fn clear_messages(&mut self) {
        self.log.clear();
    }

    /// Log a failed operation and pass the result through
    fn report<T>(&mut self, operation: &str, result: SketchResult<T>) -> SketchResult<T> {
        match &result {
            Err(SketchError::UserCancelled) => self.log.info(format!("{operation} cancelled")),
            Err(e) => self.log.error(format!("{operation} failed: {e}")),
            Ok(_) => {}
        }
        result
    }

    // ========== Collect ==========

    /// Snapshot all edges of the first selected object
    pub fn collect_data<D>(&mut self, doc: &D, selection: &Selection) -> SketchResult<CollectSummary>
    where
        D: HostDocument + ?Sized,
    {
        let result = self.try_collect(doc, selection);
        self.report("Edge collection", result)
    }

    fn try_collect<D>(&mut self, doc: &D, selection: &Selection) -> SketchResult<CollectSummary>
    where
        D: HostDocument + ?Sized,
    {
        let object = selection
            .first_object()
            .ok_or_else(|| SketchError::NoSelection("select an object first".into()))?;
        self.log.step(format!("Collecting edges of {object}"));
        let shape = doc.shape(object)?;
        self.store_collection(EdgeCollection::collect(&shape))
    }

    fn store_collection(&mut self, collection: EdgeCollection) -> SketchResult<CollectSummary> {
        let summary = CollectSummary {
            total: collection.total_count(),
            valid: collection.valid_count(),
            degenerate: collection.degenerate_count(),
        };
        self.log.success(format!(
            "Collected {} edges from {} ({} valid, {} degenerate)",
            summary.total, collection.label, summary.valid, summary.degenerate
        ));
        if collection.needs_cleaning() {
            self.log.warning(format!(
                "{} degenerate edges found; cleaning is recommended",
                summary.degenerate
            ));
        }
        self.collection = Some(collection);
        Ok(summary)
    }

    // ========== Select Coplanar ==========

    /// Names of all collected edges coplanar with the selected face or edge pair
    pub fn select_coplanar_edges(&mut self, selection: &Selection) -> SketchResult<Vec<String>> {
        let result = self.try_select_coplanar(selection);
        self.report("Coplanar selection", result)
    }

    fn try_select_coplanar(&mut self, selection: &Selection) -> SketchResult<Vec<String>> {
        let collection = self.collection.as_ref().ok_or(SketchError::NotCollected)?;
        let plane = self.reference_plane(collection, selection)?;

        let valid = collection.valid_edges();
        let coplanar = classify(&valid, &plane, self.config.plane_tolerance);
        let names: Vec<String> = coplanar
            .iter()
            .filter_map(|e| collection.name_of(e).map(str::to_string))
            .collect();

        let ratio_limit = self.config.coplanar_warning_ratio;
        if !valid.is_empty() && names.len() as f64 > valid.len() as f64 * ratio_limit {
            self.log.warning(format!(
                "{} of {} edges are coplanar; the reference may be ambiguous",
                names.len(),
                valid.len()
            ));
        }
        self.log
            .success(format!("Selected {} coplanar edges", names.len()));
        Ok(names)
    }

    fn reference_plane(
        &self,
        collection: &EdgeCollection,
        selection: &Selection,
    ) -> SketchResult<Plane> {
        if let Some((sub, item)) = selection.of_kind(SubElementKind::Face).into_iter().next() {
            let (axis, center) = match &item.sub_object {
                Some(SubObject::Face {
                    axis,
                    center_of_mass,
                }) => (*axis, *center_of_mass),
                _ => {
                    let face = collection
                        .faces
                        .get(sub.index)
                        .filter(|_| item.object == collection.object)
                        .ok_or_else(|| SketchError::InvalidSubElement(item.sub_element.clone()))?;
                    (face.axis, face.center_of_mass)
                }
            };
            return Ok(Plane::from_face(axis, center, self.config.normal_epsilon)?);
        }

        let edges = selection.of_kind(SubElementKind::Edge);
        if edges.len() < 2 {
            return Err(SketchError::NoSelection(
                "select a face or at least two edges".into(),
            ));
        }
        let first = resolve_edge(collection, edges[0].0, edges[0].1, EdgeSource::Collected)?;
        let second = resolve_edge(collection, edges[1].0, edges[1].1, EdgeSource::Collected)?;
        Ok(Plane::from_edge_pair(
            &first,
            &second,
            self.config.point(),
            self.config.normal_epsilon,
        )?)
    }

    // ========== Create Sketch ==========

    /// Create a sketch from the selected edges
    pub fn create_sketch_from_selection<D, P>(
        &mut self,
        doc: &mut D,
        prompt: &mut P,
        selection: &Selection,
    ) -> SketchResult<SynthesisReport>
    where
        D: HostDocument + ?Sized,
        P: PlacementPrompt + ?Sized,
    {
        let result = self.try_create_sketch(doc, prompt, selection);
        self.report("Sketch creation", result)
    }

    fn try_create_sketch<D, P>(
        &mut self,
        doc: &mut D,
        prompt: &mut P,
        selection: &Selection,
    ) -> SketchResult<SynthesisReport>
    where
        D: HostDocument + ?Sized,
        P: PlacementPrompt + ?Sized,
    {
        let collection = self.collection.as_ref().ok_or(SketchError::NotCollected)?;
        let edges = selection
            .of_kind(SubElementKind::Edge)
            .into_iter()
            .map(|(sub, item)| resolve_edge(collection, sub, item, EdgeSource::Host))
            .collect::<SketchResult<Vec<EdgeRef>>>()?;
        if edges.is_empty() {
            return Err(SketchError::NoSelection("no edges selected".into()));
        }
        let reference = collection.mass_center;

        self.log
            .step(format!("Creating sketch from {} edges", edges.len()));
        let placement = self.fit_placement(&edges, reference);

        let report = SketchSynthesizer::new(self.config.clone()).synthesize(
            doc, prompt, &edges, placement,
        )?;

        if report.skipped_degenerate > 0 {
            self.log.warning(format!(
                "Skipped {} degenerate edges",
                report.skipped_degenerate
            ));
        }
        for rejection in &report.rejections {
            self.log.warning(rejection.to_string());
        }
        self.log.success(format!(
            "Created sketch with {} segments and {} coincident constraints",
            report.segments_created, report.coincidence_constraints_created
        ));
        Ok(report)
    }

    fn fit_placement(&mut self, edges: &[EdgeRef], reference: glam::DVec3) -> Placement {
        let epsilon = self.config.normal_epsilon;
        let points = dedup_points(
            edges.iter().flat_map(|e| e.endpoints()),
            self.config.point(),
        );
        let fit = estimate_normal_and_centroid_with_epsilon(&points, reference, epsilon);
        // Collinear triples leave rounding noise, not an exact zero
        if fit.best_magnitude <= epsilon {
            self.log
                .warning("Selected edges are collinear; using the XY orientation");
        }
        build_placement_with_epsilon(fit.normal, fit.centroid, epsilon)
    }

    // ========== Clean ==========

    /// Rebuild the collected object from its faces without degenerate edges
    pub fn clean_degenerate_edges<D>(&mut self, doc: &mut D) -> SketchResult<CleanReport>
    where
        D: HostDocument + ?Sized,
    {
        let result = self.try_clean(doc);
        self.report("Cleaning", result)
    }

    fn try_clean<D>(&mut self, doc: &mut D) -> SketchResult<CleanReport>
    where
        D: HostDocument + ?Sized,
    {
        let collection = self.collection.as_ref().ok_or(SketchError::NotCollected)?;
        let faces = collection.clean_faces();
        if faces.is_empty() {
            return Err(GeometryError::DegenerateInput(format!(
                "no valid faces remain in {}",
                collection.label
            ))
            .into());
        }
        let source = collection.object.clone();
        let name = format!("{}_Cleaned", collection.label);
        let faces_removed = collection.faces.len() - faces.len();

        doc.open_transaction(CLEAN_TRANSACTION_NAME)?;
        let object = match build_cleaned(doc, &source, &faces, &name) {
            Ok(object) => object,
            Err(e) => {
                doc.abort_transaction();
                return Err(e.into());
            }
        };

        let object_name = doc.object_name(object).unwrap_or(name);
        let shape = doc.shape(&object_name)?;
        self.log.success(format!(
            "Created {} with {} faces ({} removed)",
            object_name,
            faces.len(),
            faces_removed
        ));
        self.store_collection(EdgeCollection::collect(&shape))?;

        Ok(CleanReport {
            object,
            name: object_name,
            faces_kept: faces.len(),
            faces_removed,
            edges_after: shape.edges.len(),
        })
    }
}

fn build_cleaned<D>(
    doc: &mut D,
    source: &str,
    faces: &[usize],
    name: &str,
) -> crate::host::HostResult<ObjectId>
where
    D: HostDocument + ?Sized,
{
    let object = doc.add_face_compound(source, faces, name)?;
    if let Some(original) = doc.find_object(source) {
        doc.set_visibility(original, false)?;
    }
    doc.recompute()?;
    doc.commit_transaction()?;
    Ok(object)
}

/// Which snapshot of a selected edge is tried first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeSource {
    /// The collected snapshot of the same object, by name
    Collected,
    /// The geometry resolved by the host selection
    Host,
}

/// Snapshot for a selected edge, falling back to the other source
fn resolve_edge(
    collection: &EdgeCollection,
    sub: SubElement,
    item: &SelectionItem,
    prefer: EdgeSource,
) -> SketchResult<EdgeRef> {
    let same_object = item.object == collection.object;
    let collected = collection
        .edges
        .get(sub.index)
        .and_then(|e| e.edge)
        .filter(|_| same_object);
    let host = match &item.sub_object {
        Some(SubObject::Edge(edge)) => Some(*edge),
        _ => None,
    };
    let found = match prefer {
        EdgeSource::Collected => collected.or(host),
        EdgeSource::Host => host.or(collected),
    };
    found.ok_or_else(|| {
        if same_object {
            SketchError::InvalidSubElement(item.sub_element.clone())
        } else {
            SketchError::InvalidSubElement(format!(
                "{}.{} is not part of the collected object",
                item.object, item.sub_element
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        MemoryDocument, ObjectKind, ScriptedPrompt, ShapeEdge, ShapeFace, TransactionOutcome,
    };
    use cps_core::CurveId;
    use glam::DVec3;

    /// Unit cube edges plus one single-vertex edge and faces referencing them
    fn cube_document() -> MemoryDocument {
        let c = |x: f64, y: f64, z: f64| DVec3::new(x, y, z);
        let corners = [
            c(0.0, 0.0, 0.0),
            c(1.0, 0.0, 0.0),
            c(1.0, 1.0, 0.0),
            c(0.0, 1.0, 0.0),
            c(0.0, 0.0, 1.0),
            c(1.0, 0.0, 1.0),
            c(1.0, 1.0, 1.0),
            c(0.0, 1.0, 1.0),
        ];
        let pairs = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let mut edges: Vec<ShapeEdge> = pairs
            .iter()
            .map(|&(a, b)| ShapeEdge::line(corners[a], corners[b]))
            .collect();
        edges.push(ShapeEdge {
            curve: CurveId::new(),
            vertices: vec![c(0.5, 0.5, 0.5)],
        });
        let faces = vec![
            ShapeFace {
                axis: -DVec3::Z,
                center_of_mass: c(0.5, 0.5, 0.0),
                edges: vec![0, 1, 2, 3],
            },
            ShapeFace {
                axis: DVec3::Z,
                center_of_mass: c(0.5, 0.5, 1.0),
                edges: vec![4, 5, 6, 7],
            },
            ShapeFace {
                axis: DVec3::X,
                center_of_mass: c(1.0, 0.5, 0.5),
                edges: vec![1, 9, 5, 10, 12],
            },
        ];
        let mut doc = MemoryDocument::new("Doc");
        doc.insert_shape("Cube", "Cube", edges, faces);
        doc
    }

    fn collected(doc: &MemoryDocument) -> CoplanarSession {
        let mut session = CoplanarSession::default();
        session
            .collect_data(doc, &Selection::new().with_name("Cube", "Face1"))
            .unwrap();
        session
    }

    #[test]
    fn test_collect_reports_degenerates() {
        let doc = cube_document();
        let mut session = CoplanarSession::default();
        let summary = session
            .collect_data(&doc, &Selection::new().with_name("Cube", "Edge1"))
            .unwrap();
        assert_eq!(summary.total, 13);
        assert_eq!(summary.valid, 12);
        assert_eq!(summary.degenerate, 1);
        assert_eq!(
            session.messages().of_level(MessageLevel::Warning).count(),
            1
        );
        let center = session.collection().unwrap().mass_center;
        assert!(center.abs_diff_eq(DVec3::splat(0.5), 1e-12));
    }

    #[test]
    fn test_collect_requires_selection() {
        let doc = cube_document();
        let mut session = CoplanarSession::default();
        assert!(matches!(
            session.collect_data(&doc, &Selection::new()),
            Err(SketchError::NoSelection(_))
        ));
        assert_eq!(session.messages().of_level(MessageLevel::Error).count(), 1);
    }

    #[test]
    fn test_select_coplanar_from_face() {
        let doc = cube_document();
        let mut session = collected(&doc);
        let names = session
            .select_coplanar_edges(&Selection::new().with_name("Cube", "Face2"))
            .unwrap();
        assert_eq!(names, vec!["Edge5", "Edge6", "Edge7", "Edge8"]);

        // Host-resolved face geometry takes precedence over the collection
        let resolved = Selection::new().with_face(
            "Cube",
            "Face2",
            DVec3::X,
            DVec3::new(0.0, 0.5, 0.5),
        );
        let names = session.select_coplanar_edges(&resolved).unwrap();
        assert_eq!(names, vec!["Edge4", "Edge8", "Edge9", "Edge12"]);
    }

    #[test]
    fn test_select_coplanar_from_two_edges() {
        let doc = cube_document();
        let mut session = collected(&doc);
        let selection = Selection::new()
            .with_name("Cube", "Edge2")
            .with_name("Cube", "Edge10");
        let names = session.select_coplanar_edges(&selection).unwrap();
        assert_eq!(names, vec!["Edge2", "Edge6", "Edge10", "Edge11"]);
    }

    #[test]
    fn test_collected_snapshot_wins_for_coplanar_selection() {
        let doc = cube_document();
        let mut session = collected(&doc);
        let stale = EdgeRef::segment(DVec3::new(5.0, 5.0, 5.0), DVec3::new(6.0, 7.0, 8.0));
        let selection = Selection::new()
            .with_edge("Cube", "Edge2", stale)
            .with_name("Cube", "Edge10");
        let names = session.select_coplanar_edges(&selection).unwrap();
        assert_eq!(names, vec!["Edge2", "Edge6", "Edge10", "Edge11"]);
    }

    #[test]
    fn test_normal_epsilon_rejects_short_edge_pair() {
        let mut doc = MemoryDocument::new("Doc");
        let edges = vec![
            ShapeEdge::line(DVec3::ZERO, DVec3::new(0.1, 0.0, 0.0)),
            ShapeEdge::line(DVec3::new(0.1, 0.0, 0.0), DVec3::new(0.1, 0.1, 0.0)),
        ];
        doc.insert_shape("Tiny", "Tiny", edges, Vec::new());
        let selection = Selection::new()
            .with_name("Tiny", "Edge1")
            .with_name("Tiny", "Edge2");

        let mut session = CoplanarSession::default();
        session.collect_data(&doc, &selection).unwrap();
        assert_eq!(session.select_coplanar_edges(&selection).unwrap().len(), 2);

        let config = SketchConfig::from_ron_str("(normal_epsilon: 1.0)").unwrap();
        let mut session = CoplanarSession::new(config);
        session.collect_data(&doc, &selection).unwrap();
        assert!(matches!(
            session.select_coplanar_edges(&selection),
            Err(SketchError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_select_coplanar_ratio_warning() {
        let doc = cube_document();
        let mut session = CoplanarSession::new(
            SketchConfig::default().with_coplanar_warning_ratio(0.25),
        );
        session
            .collect_data(&doc, &Selection::new().with_name("Cube", "Edge1"))
            .unwrap();
        session.clear_messages();
        session
            .select_coplanar_edges(&Selection::new().with_name("Cube", "Face1"))
            .unwrap();
        assert_eq!(
            session.messages().of_level(MessageLevel::Warning).count(),
            1
        );
    }

    #[test]
    fn test_select_needs_face_or_two_edges() {
        let doc = cube_document();
        let mut session = collected(&doc);
        assert!(matches!(
            session.select_coplanar_edges(&Selection::new().with_name("Cube", "Edge1")),
            Err(SketchError::NoSelection(_))
        ));
        assert!(matches!(
            CoplanarSession::default()
                .select_coplanar_edges(&Selection::new().with_name("Cube", "Face1")),
            Err(SketchError::NotCollected)
        ));
    }

    #[test]
    fn test_create_sketch_from_top_face_edges() {
        let mut doc = cube_document();
        let mut session = collected(&doc);
        let selection = ["Edge5", "Edge6", "Edge7", "Edge8"]
            .into_iter()
            .fold(Selection::new(), |s, name| s.with_name("Cube", name));

        let report = session
            .create_sketch_from_selection(&mut doc, &mut ScriptedPrompt::standalone(), &selection)
            .unwrap();
        assert_eq!(report.segments_created, 4);
        assert_eq!(report.coincidence_constraints_created, 4);

        // Top face sits above the mass center, so the normal points up
        let z = report.global_placement.z_axis();
        assert!(z.abs_diff_eq(DVec3::Z, 1e-9), "z axis {z:?}");
        assert!(report
            .global_placement
            .base
            .abs_diff_eq(DVec3::new(0.5, 0.5, 1.0), 1e-12));
        assert_eq!(doc.objects_of_kind(ObjectKind::Sketch).len(), 1);
    }

    #[test]
    fn test_create_sketch_warns_on_collinear_edges() {
        let mut doc = cube_document();
        let mut session = collected(&doc);
        let p = DVec3::new(0.1, 0.2, 0.3);
        let selection = Selection::new()
            .with_edge("Other", "Edge1", EdgeRef::segment(p, p * 3.0))
            .with_edge("Other", "Edge2", EdgeRef::segment(p * 3.0, p * 7.0));
        session.clear_messages();

        let report = session
            .create_sketch_from_selection(&mut doc, &mut ScriptedPrompt::standalone(), &selection)
            .unwrap();
        assert_eq!(report.segments_created, 2);
        assert!(session
            .messages()
            .of_level(MessageLevel::Warning)
            .any(|m| m.text.contains("collinear")));
    }

    #[test]
    fn test_create_sketch_cancelled() {
        let mut doc = cube_document();
        let mut session = collected(&doc);
        let selection = Selection::new()
            .with_name("Cube", "Edge1")
            .with_name("Cube", "Edge2");
        let result = session.create_sketch_from_selection(
            &mut doc,
            &mut ScriptedPrompt::cancel(),
            &selection,
        );
        assert!(matches!(result, Err(SketchError::UserCancelled)));
        assert_eq!(doc.object_count(), 1);
        assert_eq!(session.messages().of_level(MessageLevel::Error).count(), 0);
    }

    #[test]
    fn test_create_sketch_requires_edges() {
        let mut doc = cube_document();
        let mut session = collected(&doc);
        let result = session.create_sketch_from_selection(
            &mut doc,
            &mut ScriptedPrompt::standalone(),
            &Selection::new().with_name("Cube", "Face1"),
        );
        assert!(matches!(result, Err(SketchError::NoSelection(_))));

        let result = session.create_sketch_from_selection(
            &mut doc,
            &mut ScriptedPrompt::standalone(),
            &Selection::new().with_name("Cube", "Edge13"),
        );
        assert!(matches!(result, Err(SketchError::InvalidSubElement(_))));

        // Edges of other objects need resolved geometry
        let result = session.create_sketch_from_selection(
            &mut doc,
            &mut ScriptedPrompt::standalone(),
            &Selection::new().with_name("Other", "Edge1"),
        );
        assert!(matches!(result, Err(SketchError::InvalidSubElement(_))));
        let foreign = EdgeRef::segment(DVec3::new(0.0, 0.0, 5.0), DVec3::new(1.0, 0.0, 5.0));
        let report = session
            .create_sketch_from_selection(
                &mut doc,
                &mut ScriptedPrompt::standalone(),
                &Selection::new().with_edge("Other", "Edge1", foreign),
            )
            .unwrap();
        assert_eq!(report.segments_created, 1);
    }

    #[test]
    fn test_clean_degenerate_edges() {
        let mut doc = cube_document();
        let mut session = collected(&doc);
        let report = session.clean_degenerate_edges(&mut doc).unwrap();

        assert_eq!(report.name, "Cube_Cleaned");
        assert_eq!(report.faces_kept, 2);
        assert_eq!(report.faces_removed, 1);
        assert_eq!(report.edges_after, 8);
        assert_eq!(doc.is_visible(doc.find_object("Cube").unwrap()), Some(false));
        assert_eq!(
            doc.transactions().last().unwrap().outcome,
            TransactionOutcome::Committed
        );

        // Collection now describes the cleaned object
        let collection = session.collection().unwrap();
        assert_eq!(collection.object, "Cube_Cleaned");
        assert!(!collection.needs_cleaning());
    }

    #[test]
    fn test_clean_with_no_valid_faces() {
        let mut doc = MemoryDocument::new("Doc");
        doc.insert_shape(
            "Wire",
            "Wire",
            vec![ShapeEdge {
                curve: CurveId::new(),
                vertices: vec![DVec3::ZERO],
            }],
            vec![ShapeFace {
                axis: DVec3::Z,
                center_of_mass: DVec3::ZERO,
                edges: vec![0],
            }],
        );
        let mut session = CoplanarSession::default();
        session
            .collect_data(&doc, &Selection::new().with_name("Wire", "Edge1"))
            .unwrap();
        assert!(matches!(
            session.clean_degenerate_edges(&mut doc),
            Err(SketchError::DegenerateInput(_))
        ));
        assert_eq!(doc.object_count(), 1);
    }
}
