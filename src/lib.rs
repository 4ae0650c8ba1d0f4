//! plan - a local-first project plan format and validator
//!
//! Plans describe work as a tree of Project → Requirement → Task → Feature
//! records with status tracking and cross-item blocker references. The
//! library defines the schema contract and a defect-collecting validator;
//! the CLI is a thin consumer for authoring workflows and CI gates.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{
    validate, Defect, DefectKind, DefectRule, Feature, ProjectSnapshot, ProjectSpec, Requirement,
    Status, Task, TaskId, WorkRef,
};
