//! Defect-collecting validation over a project snapshot
//!
//! Validation never fails early and never returns `Err`: every problem in
//! the tree is collected into a defect list so callers can show a complete
//! report in one pass. An empty list means the snapshot is valid.
//!
//! Defects are data for the caller to interpret. A documentation renderer
//! may render anyway and flag them inline; an automated gate may treat any
//! defect as fatal.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::index::RefIndex;
use super::project::ProjectSnapshot;
use super::reference::WorkRef;
use super::status::Status;

/// Broad defect category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    /// Structural shape problem (duplicate ids, empty required fields)
    Schema,
    /// A reference that does not resolve to an existing target
    Reference,
    /// A status that contradicts the item's other fields
    Consistency,
}

/// The specific rule a defect violates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectRule {
    EmptyField,
    DuplicateRequirementId,
    DuplicateTaskId,
    DuplicateFeatureId,
    DanglingBlocker,
    DanglingRequirementTask,
    SelfBlocker,
    BlockedWithoutBlockers,
    DeferredWithoutRejection,
    StaleDisplayIndex,
}

impl DefectRule {
    /// Maps the rule to its broad category
    pub fn kind(&self) -> DefectKind {
        match self {
            DefectRule::EmptyField
            | DefectRule::DuplicateRequirementId
            | DefectRule::DuplicateTaskId
            | DefectRule::DuplicateFeatureId => DefectKind::Schema,

            DefectRule::DanglingBlocker | DefectRule::DanglingRequirementTask => {
                DefectKind::Reference
            }

            DefectRule::SelfBlocker
            | DefectRule::BlockedWithoutBlockers
            | DefectRule::DeferredWithoutRejection
            | DefectRule::StaleDisplayIndex => DefectKind::Consistency,
        }
    }

    /// Stable identifier used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectRule::EmptyField => "empty_field",
            DefectRule::DuplicateRequirementId => "duplicate_requirement_id",
            DefectRule::DuplicateTaskId => "duplicate_task_id",
            DefectRule::DuplicateFeatureId => "duplicate_feature_id",
            DefectRule::DanglingBlocker => "dangling_blocker",
            DefectRule::DanglingRequirementTask => "dangling_requirement_task",
            DefectRule::SelfBlocker => "self_blocker",
            DefectRule::BlockedWithoutBlockers => "blocked_without_blockers",
            DefectRule::DeferredWithoutRejection => "deferred_without_rejection",
            DefectRule::StaleDisplayIndex => "stale_display_index",
        }
    }
}

/// One reported problem: which item, which rule, and an explanation
///
/// `item` identifies the offending unit: `project` for the spec itself,
/// `req:{id}` for a requirement, and the composite ref form (`3`, `3.a`)
/// for tasks and features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Defect {
    pub item: String,
    pub rule: DefectRule,
    pub message: String,
}

impl Defect {
    fn new(item: impl Into<String>, rule: DefectRule, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            rule,
            message: message.into(),
        }
    }

    /// Returns the broad category of this defect
    pub fn kind(&self) -> DefectKind {
        self.rule.kind()
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.item, self.rule.as_str(), self.message)
    }
}

/// Validates a project snapshot, returning every defect found
///
/// Checks, in order: required project fields, requirement id uniqueness and
/// task references, task/feature id uniqueness, blocker resolution,
/// status/blocker and status/rejection consistency, and display-index
/// cache drift.
pub fn validate(snapshot: &ProjectSnapshot) -> Vec<Defect> {
    let index = RefIndex::build(snapshot);
    let mut defects = Vec::new();

    check_spec_fields(snapshot, &mut defects);
    check_requirements(snapshot, &index, &mut defects);
    check_task_uniqueness(snapshot, &mut defects);

    for task in &snapshot.tasks {
        let task_item = task.id.to_string();
        let task_ref = WorkRef::Task(task.id);

        check_feature_uniqueness(task, &mut defects);
        check_blockers(&task_item, &task_ref, &task.blockers, &index, &mut defects);
        check_status_consistency(
            &task_item,
            task.status,
            &task.blockers,
            task.has_rejection(),
            &mut defects,
        );

        for feature in &task.features {
            let feature_ref = task.feature_ref(feature);
            let feature_item = feature_ref.to_string();

            check_blockers(&feature_item, &feature_ref, &feature.blockers, &index, &mut defects);
            check_status_consistency(
                &feature_item,
                feature.status,
                &feature.blockers,
                feature.has_rejection(),
                &mut defects,
            );
        }

        if !task.feature_display_index.is_empty()
            && task.feature_display_index != task.display_index()
        {
            defects.push(Defect::new(
                &task_item,
                DefectRule::StaleDisplayIndex,
                "featureIdToDisplayIndex disagrees with feature list order",
            ));
        }
    }

    if !snapshot.spec.task_display_index.is_empty()
        && snapshot.spec.task_display_index != snapshot.task_display_index()
    {
        defects.push(Defect::new(
            "project",
            DefectRule::StaleDisplayIndex,
            "taskIdToDisplayIndex disagrees with task order",
        ));
    }

    defects
}

fn check_spec_fields(snapshot: &ProjectSnapshot, defects: &mut Vec<Defect>) {
    let spec = &snapshot.spec;
    for (field, value) in [("id", &spec.id), ("title", &spec.title), ("path", &spec.path)] {
        if value.trim().is_empty() {
            defects.push(Defect::new(
                "project",
                DefectRule::EmptyField,
                format!("{} must be a non-empty string", field),
            ));
        }
    }
}

fn check_requirements(snapshot: &ProjectSnapshot, index: &RefIndex, defects: &mut Vec<Defect>) {
    let mut seen = HashSet::new();
    for requirement in &snapshot.spec.requirements {
        let item = format!("req:{}", requirement.id);

        if !seen.insert(requirement.id) {
            defects.push(Defect::new(
                &item,
                DefectRule::DuplicateRequirementId,
                format!("requirement id {} appears more than once", requirement.id),
            ));
        }

        for task_id in &requirement.tasks {
            if index.task(*task_id).is_none() {
                defects.push(Defect::new(
                    &item,
                    DefectRule::DanglingRequirementTask,
                    format!("references task {} which does not exist", task_id),
                ));
            }
        }
    }
}

fn check_task_uniqueness(snapshot: &ProjectSnapshot, defects: &mut Vec<Defect>) {
    let mut seen = HashSet::new();
    for task in &snapshot.tasks {
        if !seen.insert(task.id) {
            defects.push(Defect::new(
                task.id.to_string(),
                DefectRule::DuplicateTaskId,
                format!("task id {} appears more than once", task.id),
            ));
        }
    }
}

fn check_feature_uniqueness(task: &crate::domain::Task, defects: &mut Vec<Defect>) {
    let mut seen = HashSet::new();
    for feature in &task.features {
        if !seen.insert(feature.id.as_str()) {
            defects.push(Defect::new(
                format!("{}.{}", task.id, feature.id),
                DefectRule::DuplicateFeatureId,
                format!("feature id '{}' appears more than once in task {}", feature.id, task.id),
            ));
        }
    }
}

fn check_blockers(
    item: &str,
    own_ref: &WorkRef,
    blockers: &[WorkRef],
    index: &RefIndex,
    defects: &mut Vec<Defect>,
) {
    for blocker in blockers {
        if blocker == own_ref {
            defects.push(Defect::new(
                item,
                DefectRule::SelfBlocker,
                format!("blocks on itself ({})", blocker),
            ));
        } else if index.resolve(blocker).is_none() {
            defects.push(Defect::new(
                item,
                DefectRule::DanglingBlocker,
                format!("blocker '{}' does not resolve to an existing task or feature", blocker),
            ));
        }
    }
}

fn check_status_consistency(
    item: &str,
    status: Status,
    blockers: &[WorkRef],
    has_rejection: bool,
    defects: &mut Vec<Defect>,
) {
    if status.is_blocked() && blockers.is_empty() {
        defects.push(Defect::new(
            item,
            DefectRule::BlockedWithoutBlockers,
            "Blocked status requires non-empty blockers",
        ));
    }

    if status.is_deferred() && !has_rejection {
        defects.push(Defect::new(
            item,
            DefectRule::DeferredWithoutRejection,
            "Deferred status requires a rejection reason",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{ProjectSpec, Requirement};
    use crate::domain::reference::TaskId;
    use crate::domain::{Feature, Task};

    fn spec_with_requirement(tasks: Vec<TaskId>) -> ProjectSpec {
        let mut spec = ProjectSpec::new("demo", "Demo", "repos/demo");
        spec.requirements.push(Requirement {
            id: 1,
            status: Status::Pending,
            description: "Scaffolding done".to_string(),
            tasks,
        });
        spec
    }

    fn rules(defects: &[Defect]) -> Vec<DefectRule> {
        defects.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn valid_tree_yields_no_defects() {
        let mut task1 = Task::new(TaskId(1), "Foundation");
        task1.features.push(Feature::new("a", "Schema"));
        task1.refresh_display_index();

        let mut task2 = Task::new(TaskId(2), "CLI");
        task2.blockers.push(WorkRef::Task(TaskId(1)));
        task2.status = Status::Blocked;

        let snapshot = ProjectSnapshot::new(
            spec_with_requirement(vec![TaskId(1), TaskId(2)]),
            vec![task1, task2],
        );

        assert_eq!(validate(&snapshot), vec![]);
    }

    #[test]
    fn blocked_task_without_blockers_is_exactly_one_defect() {
        let mut task = Task::new(TaskId(1), "Stuck");
        task.status = Status::Blocked;

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1)]), vec![task]);
        let defects = validate(&snapshot);

        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].item, "1");
        assert_eq!(defects[0].rule, DefectRule::BlockedWithoutBlockers);
        assert_eq!(defects[0].kind(), DefectKind::Consistency);
        assert_eq!(defects[0].message, "Blocked status requires non-empty blockers");
    }

    #[test]
    fn blocked_with_blockers_is_fine() {
        let target = Task::new(TaskId(1), "Target");
        let mut task = Task::new(TaskId(2), "Waiting");
        task.status = Status::Blocked;
        task.blockers.push(WorkRef::Task(TaskId(1)));

        let snapshot = ProjectSnapshot::new(
            spec_with_requirement(vec![TaskId(1), TaskId(2)]),
            vec![target, task],
        );
        assert_eq!(validate(&snapshot), vec![]);
    }

    #[test]
    fn deferred_requires_rejection() {
        let mut task = Task::new(TaskId(1), "Later");
        task.status = Status::Deferred;

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1)]), vec![task]);
        assert_eq!(rules(&validate(&snapshot)), vec![DefectRule::DeferredWithoutRejection]);
    }

    #[test]
    fn deferred_with_rejection_is_fine() {
        let mut task = Task::new(TaskId(1), "Later");
        task.status = Status::Deferred;
        task.rejection = Some("descoped for v1".to_string());

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1)]), vec![task]);
        assert_eq!(validate(&snapshot), vec![]);
    }

    #[test]
    fn dangling_feature_blocker_is_exactly_one_defect() {
        let task2 = Task::new(TaskId(2), "Target task");

        let mut task1 = Task::new(TaskId(1), "Depends");
        let mut feature = Feature::new("a", "Needs missing feature");
        feature.blockers.push(WorkRef::Feature(TaskId(2), "9".to_string()));
        task1.features.push(feature);

        let snapshot = ProjectSnapshot::new(
            spec_with_requirement(vec![TaskId(1), TaskId(2)]),
            vec![task1, task2],
        );
        let defects = validate(&snapshot);

        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].item, "1.a");
        assert_eq!(defects[0].rule, DefectRule::DanglingBlocker);
        assert_eq!(defects[0].kind(), DefectKind::Reference);
        assert!(defects[0].message.contains("2.9"));
    }

    #[test]
    fn requirement_referencing_missing_task() {
        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(7)]), vec![]);
        let defects = validate(&snapshot);

        assert_eq!(rules(&defects), vec![DefectRule::DanglingRequirementTask]);
        assert_eq!(defects[0].item, "req:1");
    }

    #[test]
    fn duplicate_ids_reported_at_each_level() {
        let mut spec = spec_with_requirement(vec![TaskId(1)]);
        spec.requirements.push(Requirement {
            id: 1,
            status: Status::Pending,
            description: "dup".to_string(),
            tasks: vec![TaskId(1)],
        });

        let mut task_a = Task::new(TaskId(1), "First");
        task_a.features.push(Feature::new("x", "One"));
        task_a.features.push(Feature::new("x", "Two"));
        let task_b = Task::new(TaskId(1), "Second");

        let snapshot = ProjectSnapshot::new(spec, vec![task_a, task_b]);
        let defects = validate(&snapshot);

        assert!(rules(&defects).contains(&DefectRule::DuplicateRequirementId));
        assert!(rules(&defects).contains(&DefectRule::DuplicateTaskId));
        assert!(rules(&defects).contains(&DefectRule::DuplicateFeatureId));
    }

    #[test]
    fn self_blocker_reported() {
        let mut task = Task::new(TaskId(1), "Ouroboros");
        task.blockers.push(WorkRef::Task(TaskId(1)));
        task.status = Status::Blocked;

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1)]), vec![task]);
        assert_eq!(rules(&validate(&snapshot)), vec![DefectRule::SelfBlocker]);
    }

    #[test]
    fn stale_feature_display_index() {
        let mut task = Task::new(TaskId(1), "Reordered");
        task.features.push(Feature::new("a", "One"));
        task.features.push(Feature::new("b", "Two"));
        task.feature_display_index.insert("a".to_string(), 2);
        task.feature_display_index.insert("b".to_string(), 1);

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1)]), vec![task]);
        let defects = validate(&snapshot);

        assert_eq!(rules(&defects), vec![DefectRule::StaleDisplayIndex]);
        assert_eq!(defects[0].item, "1");
    }

    #[test]
    fn absent_display_index_is_not_a_defect() {
        let mut task = Task::new(TaskId(1), "No cache");
        task.features.push(Feature::new("a", "One"));

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1)]), vec![task]);
        assert_eq!(validate(&snapshot), vec![]);
    }

    #[test]
    fn stale_project_display_index() {
        let mut spec = spec_with_requirement(vec![TaskId(1)]);
        spec.task_display_index.insert("1".to_string(), 3);

        let snapshot = ProjectSnapshot::new(spec, vec![Task::new(TaskId(1), "Only")]);
        let defects = validate(&snapshot);

        assert_eq!(rules(&defects), vec![DefectRule::StaleDisplayIndex]);
        assert_eq!(defects[0].item, "project");
    }

    #[test]
    fn empty_project_fields() {
        let spec = ProjectSpec::new("", "Demo", " ");
        let snapshot = ProjectSnapshot::new(spec, vec![]);
        let defects = validate(&snapshot);

        assert_eq!(
            rules(&defects),
            vec![DefectRule::EmptyField, DefectRule::EmptyField]
        );
        assert_eq!(defects[0].kind(), DefectKind::Schema);
    }

    #[test]
    fn all_defects_collected_in_one_pass() {
        let mut task = Task::new(TaskId(1), "Messy");
        task.status = Status::Blocked;
        let mut feature = Feature::new("a", "Also messy");
        feature.status = Status::Deferred;
        feature.blockers.push(WorkRef::Task(TaskId(9)));
        task.features.push(feature);

        let snapshot = ProjectSnapshot::new(spec_with_requirement(vec![TaskId(1), TaskId(8)]), vec![task]);
        let defects = validate(&snapshot);

        assert_eq!(
            rules(&defects),
            vec![
                DefectRule::DanglingRequirementTask,
                DefectRule::BlockedWithoutBlockers,
                DefectRule::DanglingBlocker,
                DefectRule::DeferredWithoutRejection,
            ]
        );
    }

    #[test]
    fn defect_display_format() {
        let defect = Defect::new("2.a", DefectRule::DanglingBlocker, "blocker '9' does not resolve");
        assert_eq!(defect.to_string(), "2.a: [dangling_blocker] blocker '9' does not resolve");
    }
}
