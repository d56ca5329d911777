//! CLI module for Wallselect.
//!
//! A single command: select and apply a wallpaper, then hand the expensive
//! work to the background phase. A few flags short-circuit into maintenance
//! actions (listing generators or transitions, clearing the cache).

mod commands;

use clap::Parser;
pub use commands::Cli;

use crate::error::WallselectError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes them.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), WallselectError> {
    let cli = Cli::parse();
    cli.execute()
}
