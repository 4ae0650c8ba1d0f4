//! JSON storage for plan data
//!
//! The spec lives in `.plan/project.json`; each task lives in its own
//! `.plan/tasks/{id}/task.json`, where the numeric directory name must match
//! the id embedded in the file. A malformed task file never aborts a scan:
//! it is collected as a load issue and the rest of the tree still loads.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;

use crate::domain::{ProjectSnapshot, ProjectSpec, Task};

/// A per-file problem encountered while loading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadIssue {
    pub file: PathBuf,
    pub message: String,
}

/// Store for one project's plan data
pub struct ProjectStore {
    plan_dir: PathBuf,
}

impl ProjectStore {
    /// Creates a store rooted at the given `.plan` directory
    pub fn new(plan_dir: impl Into<PathBuf>) -> Self {
        Self {
            plan_dir: plan_dir.into(),
        }
    }

    /// Creates the default store for a project root
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".plan"))
    }

    /// Returns the path of the project spec file
    pub fn spec_path(&self) -> PathBuf {
        self.plan_dir.join("project.json")
    }

    /// Returns the tasks directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.plan_dir.join("tasks")
    }

    /// Returns the file path for one task
    pub fn task_path(&self, task_id: u32) -> PathBuf {
        self.tasks_dir().join(task_id.to_string()).join("task.json")
    }

    /// Reads the project spec
    pub fn load_spec(&self) -> Result<ProjectSpec> {
        let path = self.spec_path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read project spec: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project spec: {}", path.display()))
    }

    /// Reads all task files, collecting per-file issues instead of failing
    ///
    /// Tasks come back sorted by their directory id. Non-numeric directory
    /// names are skipped silently (they are not task dirs); everything else
    /// that goes wrong becomes a `LoadIssue`.
    pub fn load_tasks(&self) -> Result<(Vec<Task>, Vec<LoadIssue>)> {
        let tasks_dir = self.tasks_dir();
        let mut tasks = Vec::new();
        let mut issues = Vec::new();

        if !tasks_dir.is_dir() {
            issues.push(LoadIssue {
                file: tasks_dir,
                message: "Tasks directory not found".to_string(),
            });
            return Ok((tasks, issues));
        }

        let mut dir_ids: Vec<u32> = fs::read_dir(&tasks_dir)
            .with_context(|| format!("Failed to read tasks directory: {}", tasks_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().and_then(|n| n.parse().ok()))
            .collect();
        dir_ids.sort_unstable();

        for dir_id in dir_ids {
            let path = self.task_path(dir_id);

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    issues.push(LoadIssue {
                        file: path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let task: Task = match serde_json::from_str(&content) {
                Ok(task) => task,
                Err(e) => {
                    issues.push(LoadIssue {
                        file: path,
                        message: format!("Failed to parse task: {}", e),
                    });
                    continue;
                }
            };

            if task.id.0 != dir_id {
                issues.push(LoadIssue {
                    file: path,
                    message: format!("Task id mismatch: file has {}, dir is {}", task.id, dir_id),
                });
                continue;
            }

            tasks.push(task);
        }

        Ok((tasks, issues))
    }

    /// Reads the whole tree into a snapshot
    pub fn load_snapshot(&self) -> Result<(ProjectSnapshot, Vec<LoadIssue>)> {
        let spec = self.load_spec()?;
        let (tasks, issues) = self.load_tasks()?;
        Ok((ProjectSnapshot::new(spec, tasks), issues))
    }

    /// Writes the project spec
    pub fn save_spec(&self, spec: &ProjectSpec) -> Result<()> {
        write_json(&self.spec_path(), spec)
    }

    /// Writes one task to its file
    pub fn save_task(&self, task: &Task) -> Result<()> {
        write_json(&self.task_path(task.id.0), task)
    }
}

/// Writes a value as pretty JSON via a locked temp file and atomic rename
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("json.tmp");

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock")?;

        let mut writer = std::io::BufWriter::new(&file);
        let json = serde_json::to_string_pretty(value).context("Failed to serialize")?;
        writer.write_all(json.as_bytes()).context("Failed to write")?;
        writer.write_all(b"\n").context("Failed to write")?;
        writer.flush().context("Failed to flush")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move into place: {}", path.display()))?;

    Ok(())
}
