//! Manifest parsing and validation (mkdep.toml)
//!
//! The manifest is the caller-specified configuration for a generation run.
//! It names the build file, the library partition of the source tree, and
//! the external-library table, so that none of those live as process-wide
//! constants inside the generator.
//!
//! # Manifest Format
//!
//! ```toml
//! # Build file maintained by mkdep (default "Makefile")
//! makefile = "Makefile"
//!
//! # Column budget for dependency lines (default 120)
//! max-line-length = 120
//!
//! # Angle-bracket header -> linker library name. Replaces the built-in
//! # table (curl/re2/sqlite3) when present.
//! [external-libraries]
//! "curl/curl.h" = "curl"
//! "re2/re2.h" = "re2"
//! "sqlite3.h" = "sqlite3"
//!
//! # Static archives and which part of the tree belongs to each.
//! # Test sources are never archived. A recursive library also claims the
//! # include/implementation closure of every matched file; a non-recursive
//! # one claims only the files directly under its roots.
//! [[libraries]]
//! path = "wikiutil/libwikiutil.a"
//! sort-key = 1
//! roots = ["wikiutil/"]
//! recursive = false
//!
//! [[libraries]]
//! path = "mwclient/libmwclient.a"
//! sort-key = 2
//! roots = ["mwclient/"]
//! exclude = ["mwclient/tests/"]
//! ```
//!
//! `sort-key` fixes the relative order of archives on link lines: archives of
//! different subsystems must appear in a specific, stable order regardless of
//! discovery order, and lower keys sort first.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::constants::{DEFAULT_EXTERNAL_LIBRARIES, DEFAULT_MAKEFILE, DEFAULT_MAX_LINE_LENGTH};
use crate::core::MkdepError;

fn default_makefile() -> String {
    DEFAULT_MAKEFILE.to_string()
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn default_external_libraries() -> BTreeMap<String, String> {
    DEFAULT_EXTERNAL_LIBRARIES
        .iter()
        .map(|(header, lib)| ((*header).to_string(), (*lib).to_string()))
        .collect()
}

const fn default_recursive() -> bool {
    true
}

/// One static archive and the partition of the tree that belongs to it.
///
/// Membership is exclusive: a file belongs to at most one library, claimed in
/// manifest order. Files with a `main` function can never be claimed - that
/// is a fatal configuration error, not a skip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibrarySpec {
    /// Archive output path (e.g. `mwclient/libmwclient.a`).
    pub path: String,

    /// Position among link-line archives; lower keys sort first.
    #[serde(rename = "sort-key")]
    pub sort_key: i64,

    /// Path prefixes whose files are claimed for this library.
    pub roots: Vec<String>,

    /// Path prefixes excluded from the claim (test sources are always
    /// excluded, with or without this list).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Whether claiming a file also claims its dependency closure.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

impl LibrarySpec {
    /// Whether a unit path is selected by this library's roots.
    ///
    /// Test sources never match; excluded prefixes never match.
    #[must_use]
    pub fn matches(&self, path: &str, is_test: bool) -> bool {
        if is_test {
            return false;
        }
        if self.exclude.iter().any(|prefix| path.starts_with(prefix)) {
            return false;
        }
        self.roots.iter().any(|prefix| path.starts_with(prefix))
    }
}

/// Parsed mkdep.toml manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Build file rewritten in place by `mkdep update`.
    #[serde(default = "default_makefile")]
    pub makefile: String,

    /// Column budget for dependency lines before wrapping.
    #[serde(default = "default_max_line_length", rename = "max-line-length")]
    pub max_line_length: usize,

    /// Angle-bracket header name -> linker library name.
    #[serde(default = "default_external_libraries", rename = "external-libraries")]
    pub external_libraries: BTreeMap<String, String>,

    /// Static archives, in the order their rules are emitted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<LibrarySpec>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            makefile: default_makefile(),
            max_line_length: default_max_line_length(),
            external_libraries: default_external_libraries(),
            libraries: Vec::new(),
        }
    }
}

impl Manifest {
    /// Load and validate a manifest from disk.
    ///
    /// # Errors
    ///
    /// - [`MkdepError::ManifestNotFound`] if the file does not exist
    /// - [`MkdepError::ManifestParseError`] on invalid TOML
    /// - [`MkdepError::ManifestValidationError`] on semantic problems
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MkdepError::ManifestNotFound.into());
        }
        let content = crate::utils::fs::read_text_file(path)?;
        let manifest: Self =
            toml::from_str(&content).map_err(|e| MkdepError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest semantics.
    ///
    /// Checks that every library has at least one root and that archive
    /// paths and sort keys are unique (duplicate sort keys would make the
    /// link-line archive order depend on discovery order).
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::ManifestValidationError`] describing the first
    /// problem found.
    pub fn validate(&self) -> Result<()> {
        let mut paths = HashSet::new();
        let mut sort_keys = HashSet::new();
        for library in &self.libraries {
            if library.roots.is_empty() {
                return Err(MkdepError::ManifestValidationError {
                    reason: format!("library '{}' has no roots", library.path),
                }
                .into());
            }
            if !paths.insert(library.path.as_str()) {
                return Err(MkdepError::ManifestValidationError {
                    reason: format!("duplicate library path '{}'", library.path),
                }
                .into());
            }
            if !sort_keys.insert(library.sort_key) {
                return Err(MkdepError::ManifestValidationError {
                    reason: format!(
                        "duplicate sort-key {} on library '{}'",
                        library.sort_key, library.path
                    ),
                }
                .into());
            }
        }
        if self.max_line_length == 0 {
            return Err(MkdepError::ManifestValidationError {
                reason: "max-line-length must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
