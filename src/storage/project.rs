//! Project management
//!
//! Handles plan directory initialization and provides access to the store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::ProjectSpec;

use super::{Config, ProjectStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a plan project. Run 'plan init' first.")]
    NotInProject,
}

/// An opened plan project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let plan_dir = root.join(".plan");

        if !plan_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new plan directory at the given path (idempotent)
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let plan_dir = root.join(".plan");

        fs::create_dir_all(&plan_dir)
            .with_context(|| format!("Failed to create .plan directory: {}", plan_dir.display()))?;

        let tasks_dir = plan_dir.join("tasks");
        fs::create_dir_all(&tasks_dir).with_context(|| {
            format!("Failed to create tasks directory: {}", tasks_dir.display())
        })?;

        let config_path = plan_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# plan configuration

[validate]
# Stale display-index caches are derived state; set this to true to keep
# them from failing `plan validate`.
allow_stale_display_index = false
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let store = ProjectStore::for_project(&root);
        if !store.spec_path().exists() {
            let name = root
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("project")
                .to_string();
            store.save_spec(&ProjectSpec::new(&name, &name, "."))?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .plan directory path
    pub fn plan_dir(&self) -> PathBuf {
        self.root.join(".plan")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the store for this project's plan data
    pub fn store(&self) -> ProjectStore {
        ProjectStore::for_project(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.plan_dir().is_dir());
        assert!(project.plan_dir().join("tasks").is_dir());
        assert!(project.plan_dir().join("config.toml").is_file());
        assert!(project.plan_dir().join("project.json").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap();

        assert!(dir.path().join(".plan").is_dir());
    }

    #[test]
    fn init_does_not_clobber_existing_spec() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let mut spec = project.store().load_spec().unwrap();
        spec.title = "Edited".to_string();
        project.store().save_spec(&spec).unwrap();

        Project::init(dir.path()).unwrap();
        assert_eq!(project.store().load_spec().unwrap().title, "Edited");
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Project::open(dir.path()).is_err());
    }
}
