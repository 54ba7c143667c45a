//! shape-priority - Dependency-aware task priority recalculation

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = shape_priority::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
