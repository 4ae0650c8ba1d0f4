//! Task domain model
//!
//! Tasks own an ordered list of features and may themselves be blocked on
//! other work. Legacy data calls the same concept a "story"; this model is
//! the unified shape both variants load into.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::feature::Feature;
use super::reference::{TaskId, WorkRef};
use super::status::Status;

/// A task within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the project
    pub id: TaskId,

    /// Current status
    pub status: Status,

    /// Human-readable title
    pub title: String,

    /// What the task is
    #[serde(default)]
    pub description: String,

    /// Ordered list of features (list order is authoritative)
    #[serde(default)]
    pub features: Vec<Feature>,

    /// References to work that must complete first
    /// (`dependencies` is the legacy field name)
    #[serde(default, alias = "dependencies", skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<WorkRef>,

    /// Why the task was rejected or deferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,

    /// Cached 1-based display ordering, keyed by feature id
    ///
    /// Derived from `features` order; never trusted over the list itself.
    #[serde(
        rename = "featureIdToDisplayIndex",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub feature_display_index: BTreeMap<String, usize>,
}

impl Task {
    /// Creates a new pending task with no features
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            status: Status::Pending,
            title: title.into(),
            description: String::new(),
            features: Vec::new(),
            blockers: Vec::new(),
            rejection: None,
            feature_display_index: BTreeMap::new(),
        }
    }

    /// Looks up a feature by id
    pub fn feature(&self, feature_id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == feature_id)
    }

    /// Returns the composite ref for a feature of this task
    pub fn feature_ref(&self, feature: &Feature) -> WorkRef {
        WorkRef::Feature(self.id, feature.id.clone())
    }

    /// Recomputes the 1-based display-index map from list order
    ///
    /// This is the authoritative value; the stored
    /// `featureIdToDisplayIndex` is only a cache of it.
    pub fn display_index(&self) -> BTreeMap<String, usize> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i + 1))
            .collect()
    }

    /// Replaces the cached display-index map with the recomputed one
    pub fn refresh_display_index(&mut self) {
        self.feature_display_index = self.display_index();
    }

    /// Returns true if a non-empty rejection reason is recorded
    pub fn has_rejection(&self) -> bool {
        self.rejection
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }
}
