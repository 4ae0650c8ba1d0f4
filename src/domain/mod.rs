//! Domain models for the plan format
//!
//! Contains the schema, the validator, and the blocker graph, without any
//! I/O concerns.

mod feature;
mod graph;
mod index;
mod project;
mod reference;
mod status;
mod task;
pub mod validate;

pub use feature::Feature;
pub use graph::{BlockerGraph, GraphError};
pub use index::{RefIndex, Resolved};
pub use project::{ProjectSnapshot, ProjectSpec, Requirement};
pub use reference::{RefError, TaskId, WorkRef};
pub use status::Status;
pub use task::Task;
pub use validate::{validate, Defect, DefectKind, DefectRule};
