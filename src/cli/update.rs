//! Update command: regenerate the autogenerated Makefile regions in place.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use tracing::info;

use crate::utils::fs::atomic_write;

/// Command to rebuild the include graph and rewrite the Makefile.
///
/// The whole graph is materialized and the full file text rendered in
/// memory before the single atomic write, so a failure at any point leaves
/// the Makefile on disk untouched.
#[derive(Args)]
pub struct UpdateCommand {}

impl UpdateCommand {
    /// Execute the update.
    ///
    /// # Errors
    ///
    /// Any load, resolution, or marker failure aborts before the write.
    pub fn execute(self, root: &Path, manifest_path: Option<&Path>) -> Result<()> {
        let project = super::load_project(root, manifest_path)?;
        let existing = project.read_makefile()?;
        let regenerated = project.regenerate(&existing)?;

        if regenerated == existing {
            println!("{} {} already up to date", "✓".green(), project.manifest.makefile);
            return Ok(());
        }

        atomic_write(&project.makefile_path(), regenerated.as_bytes())?;
        info!("Rewrote {} ({} bytes)", project.manifest.makefile, regenerated.len());
        println!("{} Updated {}", "✓".green(), project.manifest.makefile);
        Ok(())
    }
}
