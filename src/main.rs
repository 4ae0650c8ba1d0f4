//! plan - project plan format and validator

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = plan_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
