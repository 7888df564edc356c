//! Sketch Synthesis
//!
//! Turns a set of coplanar edges into a sketch of blocked construction
//! lines whose shared endpoints are tied together with coincident
//! constraints.

pub mod constraint;
pub mod draft;
pub mod synthesis;

use thiserror::Error;

use cps_core::GeometryError;

use crate::config::ConfigError;
use crate::host::HostError;

pub use constraint::{PointPos, SketchConstraint, VertexRef};
pub use draft::{DraftSegment, SketchDraft, VertexGroup, VertexGroups};
pub use synthesis::{SketchSynthesizer, SynthesisReport};

/// Errors of sketch-producing operations
#[derive(Debug, Clone, Error)]
pub enum SketchError {
    #[error("No selection: {0}")]
    NoSelection(String),

    #[error("Invalid sub-element: {0}")]
    InvalidSubElement(String),

    #[error("{0}")]
    DegenerateInput(#[from] GeometryError),

    #[error("Constraint rejected: {0}")]
    ConstraintRejected(String),

    #[error("Transaction failed: {0}")]
    Transaction(#[from] HostError),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("No edge data collected")]
    NotCollected,

    #[error("Body not found: {0}")]
    BodyNotFound(String),

    #[error("No usable edges ({0} degenerate skipped)")]
    NoUsableEdges(usize),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for sketch operations
pub type SketchResult<T> = Result<T, SketchError>;
