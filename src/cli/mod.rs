//! Command-line interface for mkdep
//!
//! This module contains all CLI command implementations. Each command lives
//! in its own module with its own argument structure and execution logic,
//! which keeps concerns separated and lets each command be tested
//! independently.
//!
//! # Available Commands
//!
//! - `init` - Write a starter mkdep.toml manifest
//! - `update` - Regenerate the autogenerated Makefile regions in place
//! - `check` - Verify the Makefile is in sync without writing (CI gate)
//! - `list` - Print the binary and test targets
//! - `tree` - Print the include closure of one file as a tree
//!
//! # Global Options
//!
//! All commands support:
//! - `--root` - Project root directory (defaults to the current directory)
//! - `--manifest-path` - Explicit path to mkdep.toml
//! - `--verbose` / `--quiet` - Log verbosity (mutually exclusive)
//!
//! # Basic Workflow
//!
//! ```bash
//! # 1. Create the manifest once
//! mkdep init
//!
//! # 2. After adding/removing files or includes, resync the Makefile
//! mkdep update
//!
//! # 3. In CI, fail the build when someone forgot step 2
//! mkdep check
//! ```

mod check;
mod init;
mod list;
mod tree;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Main CLI application structure for mkdep.
///
/// Handles global flags and delegates to subcommands. Uses the clap derive
/// API to generate parsing, help text, and validation; `--verbose` and
/// `--quiet` are validated as mutually exclusive by the parser.
#[derive(Parser)]
#[command(
    name = "mkdep",
    about = "Makefile dependency generator for C++ source trees",
    version,
    long_about = "mkdep statically analyzes a tree of C++ header/source files and rewrites \
                  the autogenerated portions of a Makefile (target lists and per-file \
                  compile/link rules) so they stay in sync with the actual include graph."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Project root directory (defaults to the current directory).
    ///
    /// Discovery walks this directory recursively; all paths in the
    /// generated rules are relative to it.
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Path to the manifest file (defaults to `<root>/mkdep.toml`).
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to setting `RUST_LOG=debug`. Mutually exclusive with
    /// `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write a starter mkdep.toml manifest.
    Init(init::InitCommand),

    /// Regenerate the autogenerated Makefile regions in place.
    ///
    /// Rebuilds the include graph from the current file tree, renders the
    /// target lists and compile/link/archive rules, and atomically rewrites
    /// the marked regions of the Makefile. Idempotent.
    Update(update::UpdateCommand),

    /// Verify the Makefile is in sync without writing.
    ///
    /// Exits non-zero when a fresh regeneration would change the file.
    Check(check::CheckCommand),

    /// Print the binary and test targets.
    List(list::ListCommand),

    /// Print the include closure of one file as a tree.
    Tree(tree::TreeCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// Initializes logging from the global flags, resolves the project
    /// root, and dispatches to the subcommand.
    ///
    /// # Errors
    ///
    /// Propagates the subcommand's error; the binary entry point turns it
    /// into a user-friendly message and a non-zero exit.
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let manifest_path = self.manifest_path.as_deref();
        match self.command {
            Commands::Init(cmd) => cmd.execute(&root),
            Commands::Update(cmd) => cmd.execute(&root, manifest_path),
            Commands::Check(cmd) => cmd.execute(&root, manifest_path),
            Commands::List(cmd) => cmd.execute(&root, manifest_path),
            Commands::Tree(cmd) => cmd.execute(&root, manifest_path),
        }
    }
}

/// Initialize the global tracing subscriber from the verbosity flags.
///
/// `--verbose` forces debug level, `--quiet` disables logging entirely,
/// and otherwise an existing `RUST_LOG` value is honored (defaulting to
/// warnings only).
fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("warn")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Shared helper: load the project for commands that need the full graph.
fn load_project(root: &Path, manifest_path: Option<&Path>) -> Result<crate::project::Project> {
    crate::project::Project::load(root, manifest_path)
}
