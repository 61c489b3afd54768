//! CLI command implementations

mod estimate;
mod presets;

use crate::cli::{Cli, Command};

/// Output verbosity for command results
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Totals and errors only
    Quiet,
    /// Breakdown plus totals
    Normal,
    /// Breakdown plus the resolved configuration
    Verbose,
}

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Estimate(args) => estimate::run_estimate(args, level),
        Command::Presets(args) => presets::run_presets(args, level),
    }
}
