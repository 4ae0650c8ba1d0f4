//! The `validate` command
//!
//! Loads the whole plan tree, runs the validator, and prints the full
//! defect report. Exit status is the gate: any failing defect (or unreadable
//! file) makes the command fail, so CI can run `plan validate` directly.

use anyhow::Result;

use crate::domain::validate::{validate, Defect, DefectRule};
use crate::storage::{LoadIssue, Project};

use super::output::Output;

pub fn run(output: &Output, strict: bool) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.store();

    output.verbose("Loading plan tree");
    let (snapshot, issues) = store.load_snapshot()?;
    output.verbose(&format!(
        "Loaded {} task(s), {} load issue(s)",
        snapshot.tasks.len(),
        issues.len()
    ));

    let defects = validate(&snapshot);

    let allow_stale =
        !strict && project.config().project.validate.allow_stale_display_index;
    let failing = issues.len()
        + defects
            .iter()
            .filter(|d| !(allow_stale && d.rule == DefectRule::StaleDisplayIndex))
            .count();

    render(output, &snapshot.spec.id, &defects, &issues, failing);

    if failing > 0 {
        anyhow::bail!("{} problem(s) found", failing);
    }
    Ok(())
}

fn render(output: &Output, project_id: &str, defects: &[Defect], issues: &[LoadIssue], failing: usize) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "project": project_id,
            "valid": failing == 0,
            "defects": defects,
            "issues": issues,
        }));
        return;
    }

    for issue in issues {
        println!("{}: [load_error] {}", issue.file.display(), issue.message);
    }
    for defect in defects {
        println!("{}", defect);
    }

    if defects.is_empty() && issues.is_empty() {
        println!("OK: {} is valid", project_id);
    } else {
        output.blank();
        println!("{} defect(s), {} load issue(s)", defects.len(), issues.len());
    }
}
