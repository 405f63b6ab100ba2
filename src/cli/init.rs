//! Init command for creating a starter manifest.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::constants::MANIFEST_FILE;
use crate::core::MkdepError;

const MANIFEST_TEMPLATE: &str = r#"# mkdep configuration.
#
# The Makefile must contain the four marker lines that delimit the
# regions mkdep owns:
#
#   # autogenerated-lists-begin
#   # autogenerated-lists-end
#   # autogenerated-rules-begin
#   # autogenerated-rules-end

# makefile = "Makefile"
# max-line-length = 120

# Static archives and the path prefixes that belong to each. Lower
# sort-key appears first on link lines. A recursive library also claims
# the include/implementation closure of every matched file.
#
# [[libraries]]
# path = "core/libcore.a"
# sort-key = 1
# roots = ["core/"]
# exclude = ["core/tests/"]
# recursive = true

# Angle-bracket header -> linker library name (defaults shown).
#
# [external-libraries]
# "curl/curl.h" = "curl"
# "re2/re2.h" = "re2"
# "sqlite3.h" = "sqlite3"
"#;

/// Command to initialize a project with a starter mkdep.toml.
#[derive(Args)]
pub struct InitCommand {
    /// Force overwrite if a manifest already exists.
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    /// Write the starter manifest into the project root.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::AlreadyExists`] if a manifest is present and
    /// `--force` was not given.
    pub fn execute(self, root: &Path) -> Result<()> {
        let manifest_path = root.join(MANIFEST_FILE);
        if manifest_path.exists() && !self.force {
            return Err(MkdepError::AlreadyExists {
                path: manifest_path.display().to_string(),
            }
            .into());
        }

        fs::write(&manifest_path, MANIFEST_TEMPLATE)?;
        println!("{} Created {}", "✓".green(), manifest_path.display());
        println!("\nNext steps:");
        println!("  1. Add the four marker lines to your Makefile");
        println!("  2. Run 'mkdep update' to generate the rules");
        Ok(())
    }
}
