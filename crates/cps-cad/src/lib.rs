//! Coplanar Sketch Creation
//!
//! This crate provides:
//! - The host document boundary (transactions, objects, sketches, bodies)
//! - An in-memory host document for tests and headless use
//! - Edge collection and selection parsing
//! - Sketch drafts with block and coincident constraints
//! - The sketch synthesis engine and the user-facing session

pub mod collect;
pub mod config;
pub mod host;
pub mod selection;
pub mod session;
pub mod sketch;

// Re-exports for convenience
pub use collect::{CollectedEdge, EdgeCollection};
pub use config::{ConfigError, SketchConfig};
pub use host::{
    Attachment, HostDocument, HostError, HostResult, MapMode, MemoryDocument, ObjectId,
    ObjectKind, PlacementChoice, PlacementPrompt, ScriptedPrompt, ShapeEdge, ShapeFace,
    ShapeSnapshot,
};
pub use selection::{Selection, SelectionItem, SubElement, SubElementKind, SubObject};
pub use session::{CleanReport, CollectSummary, CoplanarSession, Message, MessageLevel, MessageLog};
pub use sketch::{
    PointPos, SketchConstraint, SketchDraft, SketchError, SketchResult, SketchSynthesizer,
    SynthesisReport, VertexGroups, VertexRef,
};
