//! Tree command: print the include closure of one file.

use anyhow::Result;
use clap::Args;
use std::path::Path;

/// Command to render the include tree rooted at one unit.
///
/// Useful for answering "why does this object depend on that header"
/// without reading the generated rules.
#[derive(Args)]
pub struct TreeCommand {
    /// Repository-relative path of the header or source file.
    path: String,
}

impl TreeCommand {
    /// Execute the tree rendering.
    ///
    /// # Errors
    ///
    /// Fails when the path names no discovered unit, or on any
    /// project-load failure.
    pub fn execute(self, root: &Path, manifest_path: Option<&Path>) -> Result<()> {
        let project = super::load_project(root, manifest_path)?;
        print!("{}", project.graph.to_tree_string(&self.path)?);
        Ok(())
    }
}
