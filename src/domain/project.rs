//! Project-level records
//!
//! A `ProjectSpec` describes the project and its requirements; the tasks it
//! governs live in their own files and are joined with the spec into a
//! `ProjectSnapshot` for validation and queries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::reference::TaskId;
use super::status::Status;
use super::task::Task;

/// A project requirement, satisfied by one or more tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Identifier, unique within the project
    pub id: u32,

    /// Current status
    pub status: Status,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Ids of the tasks that satisfy this requirement
    /// (`stories` is the legacy field name)
    #[serde(default, alias = "stories")]
    pub tasks: Vec<TaskId>,
}

/// The top-level project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Identifier (slug)
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// What the project is
    #[serde(default)]
    pub description: String,

    /// Path of the target repository, relative to the workspace
    pub path: String,

    /// Upstream repository URL
    #[serde(default)]
    pub repo_url: String,

    /// Ordered list of requirements
    #[serde(default)]
    pub requirements: Vec<Requirement>,

    /// Cached 1-based display ordering, keyed by task id
    /// (`storyIdToDisplayIndex` is the legacy field name)
    #[serde(
        rename = "taskIdToDisplayIndex",
        alias = "storyIdToDisplayIndex",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub task_display_index: BTreeMap<String, usize>,

    /// Free-form metadata, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ProjectSpec {
    /// Creates a minimal spec with no requirements
    pub fn new(id: impl Into<String>, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            path: path.into(),
            repo_url: String::new(),
            requirements: Vec::new(),
            task_display_index: BTreeMap::new(),
            metadata: None,
        }
    }

    /// Looks up a requirement by id
    pub fn requirement(&self, id: u32) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }
}

/// An in-memory project tree: one spec plus its task records
///
/// This is the unit the validator, index, and graph operate on. Records are
/// authored externally and read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub spec: ProjectSpec,
    pub tasks: Vec<Task>,
}

impl ProjectSnapshot {
    pub fn new(spec: ProjectSpec, tasks: Vec<Task>) -> Self {
        Self { spec, tasks }
    }

    /// Looks up a task by id (first match; duplicates are a validation defect)
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Recomputes the project's 1-based task display-index map
    ///
    /// Keys are task ids rendered as strings, matching the persisted map.
    /// Order follows the task list as loaded.
    pub fn task_display_index(&self) -> BTreeMap<String, usize> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.to_string(), i + 1))
            .collect()
    }
}
