//! Sketch synthesis engine
//!
//! Creates a sketch of blocked construction lines from coplanar edges in a
//! single host transaction. A transient probe sketch resolves the global
//! placement; the user then chooses where the real sketch goes.

use tracing::{debug, info, warn};

use cps_core::{EdgeRef, Placement};

use super::draft::SketchDraft;
use super::{SketchError, SketchResult};
use crate::config::SketchConfig;
use crate::host::{
    Attachment, HostDocument, ObjectId, ObjectKind, PlacementChoice, PlacementPrompt,
};

/// Transaction name used for sketch creation
pub const TRANSACTION_NAME: &str = "Create Coplanar Sketch";

const PROBE_NAME: &str = "TempSketch";
const SKETCH_NAME: &str = "Sketch";
const BODY_NAME: &str = "Body";

/// Outcome of a successful synthesis
#[derive(Debug, Clone)]
pub struct SynthesisReport {
    /// The created sketch
    pub sketch: ObjectId,
    /// Where the sketch was placed
    pub target: PlacementChoice,
    /// Containing body, if any
    pub body: Option<ObjectId>,
    /// Resolved global placement of the sketch
    pub global_placement: Placement,
    pub segments_created: usize,
    pub block_constraints_created: usize,
    pub coincidence_constraints_created: usize,
    pub coincidence_constraints_rejected: usize,
    /// Why each rejected coincidence was refused
    pub rejections: Vec<SketchError>,
    /// Block constraints that could not be hidden
    pub hidden_failures: usize,
    pub skipped_degenerate: usize,
}

impl SynthesisReport {
    fn new(sketch: ObjectId, target: PlacementChoice, body: Option<ObjectId>) -> Self {
        Self {
            sketch,
            target,
            body,
            global_placement: Placement::IDENTITY,
            segments_created: 0,
            block_constraints_created: 0,
            coincidence_constraints_created: 0,
            coincidence_constraints_rejected: 0,
            rejections: Vec::new(),
            hidden_failures: 0,
            skipped_degenerate: 0,
        }
    }
}

/// Builds sketches from edge snapshots
#[derive(Debug, Clone, Default)]
pub struct SketchSynthesizer {
    config: SketchConfig,
}

impl SketchSynthesizer {
    /// Create a synthesizer with the given configuration
    pub fn new(config: SketchConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Create a sketch of `edges` at `placement`
    ///
    /// Opens one transaction and either commits it with the finished sketch
    /// or aborts it. The probe sketch is removed on every path.
    pub fn synthesize<D, P>(
        &self,
        doc: &mut D,
        prompt: &mut P,
        edges: &[EdgeRef],
        placement: Placement,
    ) -> SketchResult<SynthesisReport>
    where
        D: HostDocument + ?Sized,
        P: PlacementPrompt + ?Sized,
    {
        doc.open_transaction(TRANSACTION_NAME)?;

        let probe = match doc.add_object(ObjectKind::Sketch, PROBE_NAME) {
            Ok(id) => id,
            Err(e) => {
                doc.abort_transaction();
                return Err(e.into());
            }
        };

        let result = self.run(doc, prompt, edges, placement, probe);

        // A leftover probe must never be committed
        let result = match (result, doc.remove_object(probe)) {
            (Ok(_), Err(e)) => Err(SketchError::Transaction(e)),
            (Err(e), Err(remove)) => {
                warn!("Failed to remove placement probe: {}", remove);
                Err(e)
            }
            (result, Ok(())) => result,
        };

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                match &e {
                    SketchError::UserCancelled => info!("Sketch creation cancelled"),
                    _ => warn!("Sketch creation failed, aborting transaction: {}", e),
                }
                doc.abort_transaction();
                return Err(e);
            }
        };

        if let Err(e) = doc.recompute().and_then(|_| doc.commit_transaction()) {
            tracing::error!("Commit failed: {}", e);
            doc.abort_transaction();
            return Err(e.into());
        }

        info!(
            "Sketch created: {} segments, {} coincidences ({} rejected), {} degenerate skipped",
            report.segments_created,
            report.coincidence_constraints_created,
            report.coincidence_constraints_rejected,
            report.skipped_degenerate
        );
        Ok(report)
    }

    fn run<D, P>(
        &self,
        doc: &mut D,
        prompt: &mut P,
        edges: &[EdgeRef],
        placement: Placement,
        probe: ObjectId,
    ) -> SketchResult<SynthesisReport>
    where
        D: HostDocument + ?Sized,
        P: PlacementPrompt + ?Sized,
    {
        doc.set_placement(probe, placement)?;
        doc.recompute()?;
        let probe_global = doc.global_placement(probe)?;
        debug!("Probe placement resolved to {:?}", probe_global);

        let mut options = vec![PlacementChoice::Standalone, PlacementChoice::NewBody];
        options.extend(doc.list_bodies().into_iter().map(PlacementChoice::ExistingBody));
        let choice = prompt.choose(&options).ok_or(SketchError::UserCancelled)?;

        let (sketch, body) = self.create_destination(doc, &choice, probe_global)?;
        doc.recompute()?;
        let global = doc.global_placement(sketch)?;

        let draft = SketchDraft::build(
            edges,
            &global.inverse(),
            self.config.degenerate_tolerance,
            self.config.merge(),
        );
        if draft.is_empty() {
            return Err(SketchError::NoUsableEdges(draft.skipped_degenerate));
        }

        let mut report = SynthesisReport::new(sketch, choice, body);
        report.global_placement = global;
        report.skipped_degenerate = draft.skipped_degenerate;
        self.apply_draft(doc, sketch, &draft, &mut report)?;
        Ok(report)
    }

    fn create_destination<D>(
        &self,
        doc: &mut D,
        choice: &PlacementChoice,
        placement: Placement,
    ) -> SketchResult<(ObjectId, Option<ObjectId>)>
    where
        D: HostDocument + ?Sized,
    {
        let body = match choice {
            PlacementChoice::Standalone => {
                let sketch = doc.add_object(ObjectKind::Sketch, SKETCH_NAME)?;
                doc.set_placement(sketch, placement)?;
                info!("Created standalone sketch");
                return Ok((sketch, None));
            }
            PlacementChoice::NewBody => {
                let body = doc.add_object(ObjectKind::Body, BODY_NAME)?;
                info!("Created new body");
                body
            }
            PlacementChoice::ExistingBody(name) => {
                if !doc.list_bodies().iter().any(|b| b == name) {
                    return Err(SketchError::BodyNotFound(name.clone()));
                }
                doc.find_object(name)
                    .ok_or_else(|| SketchError::BodyNotFound(name.clone()))?
            }
        };

        let sketch = doc.add_object(ObjectKind::Sketch, SKETCH_NAME)?;
        doc.add_to_body(body, sketch)?;
        let xy = doc.body_origin_xy(body)?;
        // Offset is relative to the body's XY plane
        let offset = doc.global_placement(xy)?.inverse().multiply(&placement);
        doc.set_attachment(sketch, Attachment::object_xy(xy, offset))?;
        doc.set_placement(sketch, Placement::IDENTITY)?;
        Ok((sketch, Some(body)))
    }

    fn apply_draft<D>(
        &self,
        doc: &mut D,
        sketch: ObjectId,
        draft: &SketchDraft,
        report: &mut SynthesisReport,
    ) -> SketchResult<()>
    where
        D: HostDocument + ?Sized,
    {
        let mut geometry = Vec::with_capacity(draft.segments.len());
        let mut blocks = Vec::with_capacity(draft.blocks.len());
        for (segment, block) in draft.segments.iter().zip(&draft.blocks) {
            let index = doc.add_line_segment(sketch, segment.start, segment.end)?;
            doc.set_construction(sketch, index, true)?;
            geometry.push(index);
            report.segments_created += 1;

            let block = block.remap(|i| geometry[i]);
            blocks.push(doc.add_constraint(sketch, block)?);
            report.block_constraints_created += 1;
        }

        for coincidence in draft.coincidences() {
            let constraint = coincidence.remap(|i| geometry[i]);
            match doc.add_constraint(sketch, constraint) {
                Ok(_) => report.coincidence_constraints_created += 1,
                Err(e) => {
                    warn!("Could not add coincident constraint {:?}: {}", constraint, e);
                    report.coincidence_constraints_rejected += 1;
                    report
                        .rejections
                        .push(SketchError::ConstraintRejected(format!("{constraint:?}: {e}")));
                }
            }
        }

        if self.config.hide_block_constraints {
            for index in blocks {
                if let Err(e) = doc.set_constraint_hidden(sketch, index, true) {
                    warn!("Could not hide block constraint {}: {}", index, e);
                    report.hidden_failures += 1;
                }
            }
        }

        Ok(())
    }
}
