//! Check command: verify the Makefile is in sync without writing.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::Path;

/// Command to detect a stale Makefile (CI gate).
///
/// Performs the same computation as `update` but never writes; a
/// difference between the regenerated text and the file on disk is
/// reported as an error so the process exits non-zero.
#[derive(Args)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Execute the check.
    ///
    /// # Errors
    ///
    /// Fails when the Makefile is out of date, or on any load failure.
    pub fn execute(self, root: &Path, manifest_path: Option<&Path>) -> Result<()> {
        let project = super::load_project(root, manifest_path)?;
        let existing = project.read_makefile()?;
        let regenerated = project.regenerate(&existing)?;

        if regenerated != existing {
            eprintln!("{} {} is out of date", "✗".red(), project.manifest.makefile);
            bail!("{} is out of date; run 'mkdep update'", project.manifest.makefile);
        }

        println!("{} {} is up to date", "✓".green(), project.manifest.makefile);
        Ok(())
    }
}
