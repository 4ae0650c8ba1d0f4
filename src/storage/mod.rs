//! # Storage Layer
//!
//! Persistence for plan data with git-friendly file formats.
//!
//! ## Project Structure
//!
//! ```text
//! .plan/
//! ├── project.json          # Project spec (requirements, metadata)
//! ├── tasks/
//! │   ├── 1/task.json       # One task per numeric directory
//! │   └── 2/task.json
//! └── config.toml           # Project configuration
//! ```
//!
//! All writes are atomic (locked temp file + rename). Loads collect
//! per-file issues instead of aborting on the first bad record.
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a plan project
//! - [`ProjectStore`] - Read/write the spec and task files
//! - [`Config`] - Project configuration

mod config;
mod project;
mod store;

pub use config::{Config, ConfigError, ProjectConfig, ValidateConfig};
pub use project::{Project, ProjectError};
pub use store::{LoadIssue, ProjectStore};
