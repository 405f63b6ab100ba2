//! List command: print the binary and test targets.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::Path;

/// Which targets to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    /// Non-test executables only.
    Bins,
    /// Test executables only.
    Tests,
    /// Both.
    All,
}

/// Output format for the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One target per line.
    Text,
    /// A JSON object with `binaries` and `tests` arrays.
    Json,
}

/// Command to print executable targets derived from the graph.
#[derive(Args)]
pub struct ListCommand {
    /// Which targets to list.
    #[arg(long, value_enum, default_value = "all")]
    kind: ListKind,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ListCommand {
    /// Execute the listing.
    ///
    /// # Errors
    ///
    /// Fails on any project-load failure.
    pub fn execute(self, root: &Path, manifest_path: Option<&Path>) -> Result<()> {
        let project = super::load_project(root, manifest_path)?;
        let (binaries, tests) = project.executables();

        match self.format {
            OutputFormat::Json => {
                let value = match self.kind {
                    ListKind::Bins => serde_json::json!({ "binaries": binaries }),
                    ListKind::Tests => serde_json::json!({ "tests": tests }),
                    ListKind::All => {
                        serde_json::json!({ "binaries": binaries, "tests": tests })
                    }
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                if self.kind != ListKind::Tests {
                    for binary in &binaries {
                        println!("{binary}");
                    }
                }
                if self.kind != ListKind::Bins {
                    for test in &tests {
                        println!("{test}");
                    }
                }
            }
        }
        Ok(())
    }
}
