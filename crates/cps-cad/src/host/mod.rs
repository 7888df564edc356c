//! Host document boundary
//!
//! The modeling application is reached only through [`HostDocument`] and
//! [`PlacementPrompt`]. [`MemoryDocument`] is an in-process implementation
//! used by tests and headless tooling.

pub mod memory;
mod traits;

pub use memory::{
    MemoryDocument, ScriptedPrompt, SketchData, SketchLine, TransactionOutcome, TransactionRecord,
};
pub use traits::*;
