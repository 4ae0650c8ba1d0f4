//! Reference index over a project snapshot
//!
//! Builds the lookup tables the validator and queries need: tasks by id,
//! features by composite ref, and the reverse map of who blocks on whom.

use std::collections::HashMap;

use super::feature::Feature;
use super::project::ProjectSnapshot;
use super::reference::{TaskId, WorkRef};
use super::status::Status;
use super::task::Task;

/// A resolved reference target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Task(&'a Task),
    Feature(&'a Task, &'a Feature),
}

impl<'a> Resolved<'a> {
    /// Returns the status of the referenced unit
    pub fn status(&self) -> Status {
        match self {
            Resolved::Task(task) => task.status,
            Resolved::Feature(_, feature) => feature.status,
        }
    }

    /// Returns the title of the referenced unit
    pub fn title(&self) -> &'a str {
        match self {
            Resolved::Task(task) => &task.title,
            Resolved::Feature(_, feature) => &feature.title,
        }
    }
}

/// Lookup index over one snapshot
///
/// Duplicate ids keep the first occurrence; the validator reports the
/// duplicates themselves.
#[derive(Debug, Default)]
pub struct RefIndex<'a> {
    tasks_by_id: HashMap<TaskId, &'a Task>,
    features_by_ref: HashMap<WorkRef, (&'a Task, &'a Feature)>,
    dependents_of: HashMap<WorkRef, Vec<WorkRef>>,
}

impl<'a> RefIndex<'a> {
    /// Builds the index from a snapshot
    pub fn build(snapshot: &'a ProjectSnapshot) -> Self {
        let mut index = Self::default();

        for task in &snapshot.tasks {
            index.tasks_by_id.entry(task.id).or_insert(task);
            for feature in &task.features {
                index
                    .features_by_ref
                    .entry(task.feature_ref(feature))
                    .or_insert((task, feature));
            }
        }

        for task in &snapshot.tasks {
            let task_ref = WorkRef::Task(task.id);
            for blocker in &task.blockers {
                index
                    .dependents_of
                    .entry(blocker.clone())
                    .or_default()
                    .push(task_ref.clone());
            }
            for feature in &task.features {
                let feature_ref = task.feature_ref(feature);
                for blocker in &feature.blockers {
                    index
                        .dependents_of
                        .entry(blocker.clone())
                        .or_default()
                        .push(feature_ref.clone());
                }
            }
        }

        index
    }

    /// Resolves a reference to its target, if it exists
    pub fn resolve(&self, work_ref: &WorkRef) -> Option<Resolved<'a>> {
        match work_ref {
            WorkRef::Task(id) => self.tasks_by_id.get(id).copied().map(Resolved::Task),
            WorkRef::Feature(..) => self
                .features_by_ref
                .get(work_ref)
                .map(|&(t, f)| Resolved::Feature(t, f)),
        }
    }

    /// Looks up a task by id
    pub fn task(&self, id: TaskId) -> Option<&'a Task> {
        self.tasks_by_id.get(&id).copied()
    }

    /// Returns the items that block on the given reference (reverse edges)
    pub fn dependents(&self, work_ref: &WorkRef) -> &[WorkRef] {
        self.dependents_of
            .get(work_ref)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates every item ref in the snapshot: tasks, then their features
    pub fn all_refs(&self) -> impl Iterator<Item = WorkRef> + '_ {
        let tasks = self.tasks_by_id.keys().map(|id| WorkRef::Task(*id));
        let features = self.features_by_ref.keys().cloned();
        tasks.chain(features)
    }

    /// Number of distinct tasks indexed
    pub fn task_count(&self) -> usize {
        self.tasks_by_id.len()
    }

    /// Number of distinct features indexed
    pub fn feature_count(&self) -> usize {
        self.features_by_ref.len()
    }
}
