//! mkdep CLI entry point
//!
//! Handles command-line argument parsing, error display, and command
//! execution. Any fatal error is rendered with context and suggestions
//! before the process exits non-zero; by that point nothing has been
//! written, so the Makefile on disk is never left half-updated.

use anyhow::Result;
use clap::Parser;
use mkdep::cli::Cli;
use mkdep::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
