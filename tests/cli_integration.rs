//! CLI integration tests for plan
//!
//! These tests drive the binary end to end: initialize a plan directory,
//! author record files the way external tooling does, and check what
//! `validate` and the query commands report.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the plan binary
fn plan_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("plan"))
}

/// Create a temporary directory and initialize a plan project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    plan_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Write a task file the way external tooling authors them
fn write_task(root: &Path, id: u32, json: &str) {
    let dir = root.join(".plan/tasks").join(id.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("task.json"), json).unwrap();
}

fn write_spec(root: &Path, json: &str) {
    fs::write(root.join(".plan/project.json"), json).unwrap();
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    plan_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized plan project"));

    assert!(dir.path().join(".plan").is_dir());
    assert!(dir.path().join(".plan/tasks").is_dir());
    assert!(dir.path().join(".plan/config.toml").is_file());
    assert!(dir.path().join(".plan/project.json").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    plan_cmd().arg("init").arg(dir.path()).assert().success();
    plan_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_fail_outside_project() {
    let dir = TempDir::new().unwrap();

    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a plan project"));
}

// =============================================================================
// Validate
// =============================================================================

#[test]
fn test_validate_fresh_project_is_valid() {
    let dir = setup_project();

    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_validate_reports_blocked_without_blockers() {
    let dir = setup_project();
    write_spec(
        dir.path(),
        r#"{
            "id": "demo", "title": "Demo", "description": "", "path": ".",
            "repo_url": "",
            "requirements": [
                {"id": 1, "status": "-", "description": "scaffolding", "tasks": [1]}
            ]
        }"#,
    );
    write_task(
        dir.path(),
        1,
        r#"{"id": 1, "status": "?", "title": "Stuck", "description": "", "features": []}"#,
    );

    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("blocked_without_blockers"))
        .stdout(predicate::str::contains("1 defect(s)"));
}

#[test]
fn test_validate_reports_dangling_feature_blocker() {
    let dir = setup_project();
    write_task(
        dir.path(),
        1,
        r#"{
            "id": 1, "status": "-", "title": "Depends", "description": "",
            "features": [{
                "id": "a", "status": "-", "title": "Needs missing feature",
                "description": "", "plan": "",
                "dependencies": [{"type": "feature", "task_id": 2, "feature_id": "2.9"}]
            }]
        }"#,
    );
    write_task(
        dir.path(),
        2,
        r#"{"id": 2, "status": "-", "title": "No feature nine", "description": "", "features": []}"#,
    );

    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("1.a: [dangling_blocker]"))
        .stdout(predicate::str::contains("2.9"))
        .stdout(predicate::str::contains("1 defect(s)"));
}

#[test]
fn test_validate_json_output() {
    let dir = setup_project();
    write_task(
        dir.path(),
        1,
        r#"{"id": 1, "status": "=", "title": "Deferred without reason", "features": []}"#,
    );

    let output = plan_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "validate"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], serde_json::json!(false));
    assert_eq!(report["defects"][0]["rule"], "deferred_without_rejection");
    assert_eq!(report["defects"][0]["item"], "1");
}

#[test]
fn test_validate_reports_unparseable_task_file() {
    let dir = setup_project();
    write_task(dir.path(), 1, "{this is not json");

    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("load_error"))
        .stdout(predicate::str::contains("1 load issue(s)"));
}

#[test]
fn test_validate_allows_stale_display_index_when_configured() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".plan/config.toml"),
        "[validate]\nallow_stale_display_index = true\n",
    )
    .unwrap();
    write_task(
        dir.path(),
        1,
        r#"{
            "id": 1, "status": "-", "title": "Reordered", "description": "",
            "features": [
                {"id": "a", "status": "-", "title": "One", "description": "", "plan": ""},
                {"id": "b", "status": "-", "title": "Two", "description": "", "plan": ""}
            ],
            "featureIdToDisplayIndex": {"a": 2, "b": 1}
        }"#,
    );

    // Allowed by config: the defect is still printed but does not gate
    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("stale_display_index"));

    // --strict overrides the allowance
    plan_cmd()
        .current_dir(dir.path())
        .args(["validate", "--strict"])
        .assert()
        .failure();
}

#[test]
fn test_validate_accepts_legacy_story_spec() {
    let dir = setup_project();
    write_spec(
        dir.path(),
        r#"{
            "id": "legacy", "title": "Legacy", "description": "", "path": ".",
            "repo_url": "",
            "requirements": [
                {"id": 1, "status": "-", "description": "r", "stories": ["1"]}
            ],
            "storyIdToDisplayIndex": {"1": 1}
        }"#,
    );
    write_task(
        dir.path(),
        1,
        r#"{"id": "1", "status": "~", "title": "Story-era task", "features": []}"#,
    );

    plan_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success();
}

// =============================================================================
// Queries
// =============================================================================

fn setup_two_task_project() -> TempDir {
    let dir = setup_project();
    write_task(
        dir.path(),
        1,
        r#"{
            "id": 1, "status": "+", "title": "Foundation", "description": "",
            "features": [
                {"id": "a", "status": "+", "title": "Schema", "description": "", "plan": "types first"}
            ]
        }"#,
    );
    write_task(
        dir.path(),
        2,
        r#"{
            "id": 2, "status": "-", "title": "CLI", "description": "",
            "blockers": ["1"],
            "features": [
                {"id": "a", "status": "-", "title": "Wire commands", "description": "",
                 "plan": "", "blockers": ["1.a"],
                 "acceptance": ["validate exits nonzero on defects"]}
            ]
        }"#,
    );
    dir
}

#[test]
fn test_status_counts() {
    let dir = setup_two_task_project();

    plan_cmd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 task(s)"))
        .stdout(predicate::str::contains("done"));
}

#[test]
fn test_list_shows_tasks() {
    let dir = setup_two_task_project();

    plan_cmd()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Foundation"))
        .stdout(predicate::str::contains("CLI"));
}

#[test]
fn test_show_task_and_feature() {
    let dir = setup_two_task_project();

    plan_cmd()
        .current_dir(dir.path())
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CLI"))
        .stdout(predicate::str::contains("2.a"));

    plan_cmd()
        .current_dir(dir.path())
        .args(["show", "2.a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wire commands"))
        .stdout(predicate::str::contains("validate exits nonzero"));
}

#[test]
fn test_show_unknown_ref_fails() {
    let dir = setup_two_task_project();

    plan_cmd()
        .current_dir(dir.path())
        .args(["show", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task or feature"));
}

#[test]
fn test_ready_and_blocked() {
    let dir = setup_two_task_project();

    // Task 1 is done; task 2 and its feature have all blockers complete
    plan_cmd()
        .current_dir(dir.path())
        .arg("ready")
        .assert()
        .success()
        .stdout(predicate::str::contains("2"))
        .stdout(predicate::str::contains("Wire commands"));

    plan_cmd()
        .current_dir(dir.path())
        .arg("blocked")
        .assert()
        .success()
        .stdout(predicate::str::contains("No items are blocked"));
}

#[test]
fn test_blocked_on_incomplete_work() {
    let dir = setup_project();
    write_task(
        dir.path(),
        1,
        r#"{"id": 1, "status": "-", "title": "First", "features": []}"#,
    );
    write_task(
        dir.path(),
        2,
        r#"{"id": 2, "status": "-", "title": "Second", "blockers": ["1"], "features": []}"#,
    );

    plan_cmd()
        .current_dir(dir.path())
        .arg("blocked")
        .assert()
        .success()
        .stdout(predicate::str::contains("Second"));
}

// =============================================================================
// Wire format
// =============================================================================

#[test]
fn test_round_trip_preserves_tree() {
    let dir = setup_project();
    let authored = r#"{
        "id": 3, "status": "~", "title": "Round trip", "description": "d",
        "features": [{
            "id": "a", "status": "?", "title": "F", "description": "fd",
            "plan": "p", "context": ["src/lib.rs"], "acceptance": ["works"],
            "blockers": ["1"]
        }],
        "blockers": ["2.b"],
        "rejection": "not yet",
        "featureIdToDisplayIndex": {"a": 1}
    }"#;

    let task: plan_cli::Task = serde_json::from_str(authored).unwrap();
    let json = serde_json::to_string(&task).unwrap();
    let reparsed: plan_cli::Task = serde_json::from_str(&json).unwrap();
    assert_eq!(task, reparsed);
}
