//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Checks | Data integrity | `validate`, `validate --strict` |
//! | Queries | Plan state | `status`, `list`, `show`, `ready`, `blocked` |
//!
//! All commands support `--format text|json` and `--verbose`.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod show;
mod validate_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
