//! The `list` and `show` commands

use anyhow::Result;

use crate::domain::{RefIndex, Resolved, Task, WorkRef};
use crate::storage::Project;

use super::output::Output;

/// Lists all tasks with feature counts
pub fn list(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (snapshot, _issues) = project.store().load_snapshot()?;

    if output.is_json() {
        let items: Vec<_> = snapshot
            .tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "status": t.status,
                    "title": t.title,
                    "features": t.features.len(),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if snapshot.tasks.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<9} TITLE", "ID", "STATUS", "FEATURES");
    for task in &snapshot.tasks {
        println!(
            "{:<6} {:<12} {:<9} {}",
            task.id.to_string(),
            task.status.label(),
            task.features.len(),
            task.title
        );
    }

    Ok(())
}

/// Shows one task or feature by ref (`3` or `3.a`)
pub fn show(output: &Output, ref_str: &str) -> Result<()> {
    let work_ref: WorkRef = ref_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid ref '{}': {}", ref_str, e))?;

    let project = Project::open_current()?;
    let (snapshot, _issues) = project.store().load_snapshot()?;
    let index = RefIndex::build(&snapshot);

    let resolved = index
        .resolve(&work_ref)
        .ok_or_else(|| anyhow::anyhow!("No task or feature with ref '{}'", work_ref))?;

    match resolved {
        Resolved::Task(task) => show_task(output, task),
        Resolved::Feature(task, feature) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "ref": work_ref.to_string(),
                    "task": task.id,
                    "feature": feature,
                }));
                return Ok(());
            }

            println!("{} [{}] {}", work_ref, feature.status.label(), feature.title);
            if !feature.description.is_empty() {
                println!("  {}", feature.description);
            }
            if !feature.plan.is_empty() {
                output.blank();
                println!("Plan:");
                println!("  {}", feature.plan);
            }
            if !feature.acceptance.is_empty() {
                output.blank();
                println!("Acceptance:");
                for criterion in &feature.acceptance {
                    println!("  - {}", criterion);
                }
            }
            if !feature.context.is_empty() {
                output.blank();
                println!("Context:");
                for reference in &feature.context {
                    println!("  - {}", reference);
                }
            }
            if !feature.blockers.is_empty() {
                output.blank();
                print_blockers(&feature.blockers);
            }
            if let Some(rejection) = &feature.rejection {
                output.blank();
                println!("Rejection: {}", rejection);
            }
            Ok(())
        }
    }
}

fn show_task(output: &Output, task: &Task) -> Result<()> {
    if output.is_json() {
        output.data(task);
        return Ok(());
    }

    println!("{} [{}] {}", task.id, task.status.label(), task.title);
    if !task.description.is_empty() {
        println!("  {}", task.description);
    }

    if !task.blockers.is_empty() {
        output.blank();
        print_blockers(&task.blockers);
    }
    if let Some(rejection) = &task.rejection {
        output.blank();
        println!("Rejection: {}", rejection);
    }

    if !task.features.is_empty() {
        output.blank();
        println!("{:<10} {:<12} TITLE", "REF", "STATUS");
        for feature in &task.features {
            println!(
                "{:<10} {:<12} {}",
                format!("{}.{}", task.id, feature.id),
                feature.status.label(),
                feature.title
            );
        }
    }

    Ok(())
}

fn print_blockers(blockers: &[WorkRef]) {
    println!("Blockers:");
    for blocker in blockers {
        println!("  - {}", blocker);
    }
}
