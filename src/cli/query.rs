//! State queries: status overview, ready and blocked items

use anyhow::Result;
use std::collections::BTreeMap;

use crate::domain::{BlockerGraph, ProjectSnapshot, RefIndex, Status, WorkRef};
use crate::storage::Project;

use super::output::Output;

fn load() -> Result<ProjectSnapshot> {
    let project = Project::open_current()?;
    let (snapshot, _issues) = project.store().load_snapshot()?;
    Ok(snapshot)
}

/// Shows per-status counts for tasks and features
pub fn status(output: &Output) -> Result<()> {
    let snapshot = load()?;

    let mut task_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut feature_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in &snapshot.tasks {
        *task_counts.entry(task.status.label()).or_default() += 1;
        for feature in &task.features {
            *feature_counts.entry(feature.status.label()).or_default() += 1;
        }
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "project": snapshot.spec.id,
            "requirements": snapshot.spec.requirements.len(),
            "tasks": task_counts,
            "features": feature_counts,
        }));
        return Ok(());
    }

    println!("{}: {}", snapshot.spec.id, snapshot.spec.title);
    println!(
        "{} requirement(s), {} task(s)",
        snapshot.spec.requirements.len(),
        snapshot.tasks.len()
    );
    output.blank();

    println!("{:<14} {:>6} {:>9}", "STATUS", "TASKS", "FEATURES");
    for status in Status::ALL {
        let label = status.label();
        println!(
            "{:<14} {:>6} {:>9}",
            format!("{} {}", status.symbol(), label),
            task_counts.get(label).copied().unwrap_or(0),
            feature_counts.get(label).copied().unwrap_or(0),
        );
    }

    Ok(())
}

/// Shows items ready to work on
pub fn ready(output: &Output) -> Result<()> {
    let snapshot = load()?;
    let graph = BlockerGraph::from_snapshot(&snapshot)?;

    render_refs(output, &snapshot, &graph.ready(), "No items are ready")
}

/// Shows items waiting on incomplete blockers
pub fn blocked(output: &Output) -> Result<()> {
    let snapshot = load()?;
    let graph = BlockerGraph::from_snapshot(&snapshot)?;

    render_refs(output, &snapshot, &graph.blocked(), "No items are blocked")
}

fn render_refs(
    output: &Output,
    snapshot: &ProjectSnapshot,
    refs: &[WorkRef],
    empty_message: &str,
) -> Result<()> {
    let index = RefIndex::build(snapshot);

    if output.is_json() {
        let items: Vec<_> = refs
            .iter()
            .map(|r| {
                serde_json::json!({
                    "ref": r.to_string(),
                    "title": index.resolve(r).map(|t| t.title().to_string()),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if refs.is_empty() {
        println!("{}", empty_message);
        return Ok(());
    }

    println!("{:<10} {:<12} TITLE", "REF", "STATUS");
    for r in refs {
        let (status, title) = index
            .resolve(r)
            .map(|t| (t.status().label(), t.title()))
            .unwrap_or(("?", ""));
        println!("{:<10} {:<12} {}", r.to_string(), status, title);
    }

    Ok(())
}
