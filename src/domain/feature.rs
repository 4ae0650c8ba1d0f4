//! Feature domain model
//!
//! Features are the smallest planned units of work, owned by a task. Each
//! carries its implementation plan and acceptance criteria as authored text.

use serde::{Deserialize, Serialize};

use super::reference::WorkRef;
use super::status::Status;

/// A feature within a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Identifier, unique within the owning task
    pub id: String,

    /// Current status
    pub status: Status,

    /// Human-readable title
    pub title: String,

    /// What the feature is
    #[serde(default)]
    pub description: String,

    /// Implementation plan text
    #[serde(default)]
    pub plan: String,

    /// Context references (file paths, prior decisions, free text)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,

    /// Acceptance-criteria strings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance: Vec<String>,

    /// References to work that must complete first
    /// (`dependencies` is the legacy field name)
    #[serde(default, alias = "dependencies", skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<WorkRef>,

    /// Why the feature was rejected or deferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl Feature {
    /// Creates a new pending feature
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: Status::Pending,
            title: title.into(),
            description: String::new(),
            plan: String::new(),
            context: Vec::new(),
            acceptance: Vec::new(),
            blockers: Vec::new(),
            rejection: None,
        }
    }

    /// Returns true if a non-empty rejection reason is recorded
    pub fn has_rejection(&self) -> bool {
        self.rejection
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }
}
