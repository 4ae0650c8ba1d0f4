//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{query, show, validate_cmd};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "plan")]
#[command(author, version, about = "Project plan format and validator for software teams")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new plan directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Check the plan tree and report every defect
    Validate {
        /// Fail on every defect, ignoring config allowances
        #[arg(long)]
        strict: bool,
    },

    /// Show per-status counts
    Status,

    /// List all tasks
    List,

    /// Show one task or feature by ref (e.g. `3` or `3.a`)
    Show {
        /// Task or feature ref
        r#ref: String,
    },

    /// Show items ready to work on
    Ready,

    /// Show items waiting on incomplete blockers
    Blocked,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    match cli.command {
        Commands::Init { path } => {
            output.verbose(&format!("Initializing plan directory at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized plan project at {}",
                project.root().display()
            ));
        }

        Commands::Validate { strict } => validate_cmd::run(&output, strict)?,
        Commands::Status => query::status(&output)?,
        Commands::List => show::list(&output)?,
        Commands::Show { r#ref } => show::show(&output, &r#ref)?,
        Commands::Ready => query::ready(&output)?,
        Commands::Blocked => query::blocked(&output)?,
    }

    Ok(())
}
