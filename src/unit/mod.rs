//! Source-unit parsing
//!
//! A [`SourceUnit`] is the structured record of one header or source file:
//! its quoted includes (resolved to repository-relative paths), the external
//! libraries implied by its angle-bracket includes, whether it defines a
//! `main` function, and an optional explicit header-implementation override.
//!
//! Parsing is a single top-to-bottom scan of the text. Each line is matched
//! against the recognized directive forms independently, first match wins,
//! and lines matching none of the forms are silently ignored - most lines of
//! a C++ file match nothing, and that is not an error.
//!
//! # Recognized line forms
//!
//! - `#include "local.h"` - appended to the unit's quoted includes, resolved
//!   relative to the including file's directory unless the literal text
//!   already contains a `/`, in which case it is taken as root-relative.
//! - `#include <curl/curl.h>` - looked up in the external-library table;
//!   known headers add their linker library name, unknown ones are skipped.
//! - `int main(` at the start of a line (source files only) - marks the unit
//!   as a linkable entry point.
//! - `// IMPLEMENTS: <path>` - declares the header this source implements,
//!   overriding the `foo.cpp` -> `foo.h` naming convention. The remainder of
//!   the line is trimmed and resolved like an include path.
//!
//! The external-library table is an explicit argument, not a process-wide
//! constant, so parsing stays pure and testable in isolation.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use crate::constants::{SOURCE_EXTENSION, TEST_SUFFIX};

/// Prefix of an explicit header-implementation override line.
const IMPLEMENTS_DIRECTIVE: &str = "// IMPLEMENTS:";

/// Prefix identifying a main-function definition.
const MAIN_SIGNATURE: &str = "int main(";

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^#include ([<"])([^"<>]+)"#).expect("valid include regex"))
}

/// Whether a unit is a header or a translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A `.h` file; compiled into nothing by itself.
    Header,
    /// A `.cpp` file; compiled into an object file.
    Source,
}

/// One header or source file as modeled in the dependency graph.
///
/// Units are constructed immutably from parsed content; graph edges and
/// library ownership live outside the unit (see [`crate::graph`] and
/// [`crate::library`]) and are populated in later passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Normalized repository-relative path; the unique key for this unit.
    pub path: String,
    /// `path` with its extension stripped; stem for derived artifacts.
    pub path_without_ext: String,
    /// Header or source.
    pub kind: UnitKind,
    /// Source whose stem ends in the test suffix (`_test`).
    pub is_test: bool,
    /// Source defining `int main(`.
    pub has_main_function: bool,
    /// Resolved paths of quoted includes, in order of appearance.
    pub quoted_include_paths: Vec<String>,
    /// Linker library names implied by recognized angle-bracket includes.
    pub external_library_refs: BTreeSet<String>,
    /// Header path declared by a `// IMPLEMENTS:` directive, if any.
    pub implements_override: Option<String>,
}

impl SourceUnit {
    /// Parse one file's content into a unit.
    ///
    /// # Arguments
    ///
    /// * `path` - Normalized repository-relative path of the file
    /// * `content` - The file's full text
    /// * `external_libraries` - Angle-bracket header -> library name table
    #[must_use]
    pub fn parse(path: &str, content: &str, external_libraries: &BTreeMap<String, String>) -> Self {
        let (path_without_ext, extension) = match path.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_string(), ext),
            None => (path.to_string(), ""),
        };
        let kind = if extension == SOURCE_EXTENSION {
            UnitKind::Source
        } else {
            UnitKind::Header
        };
        let is_test = kind == UnitKind::Source && path_without_ext.ends_with(TEST_SUFFIX);

        let mut unit = Self {
            path: path.to_string(),
            path_without_ext,
            kind,
            is_test,
            has_main_function: false,
            quoted_include_paths: Vec::new(),
            external_library_refs: BTreeSet::new(),
            implements_override: None,
        };
        unit.scan(content, external_libraries);
        unit
    }

    /// Single top-to-bottom scan populating the directive-derived fields.
    fn scan(&mut self, content: &str, external_libraries: &BTreeMap<String, String>) {
        for line in content.lines() {
            if let Some(captures) = include_regex().captures(line) {
                let header = &captures[2];
                if &captures[1] == "\"" {
                    let resolved = self.resolve_from_root(header);
                    self.quoted_include_paths.push(resolved);
                } else if let Some(library) = external_libraries.get(header) {
                    self.external_library_refs.insert(library.clone());
                }
            } else if self.kind == UnitKind::Source && line.starts_with(MAIN_SIGNATURE) {
                self.has_main_function = true;
            } else if let Some(rest) = line.strip_prefix(IMPLEMENTS_DIRECTIVE) {
                self.implements_override = Some(self.resolve_from_root(rest.trim()));
            }
        }
    }

    /// Resolve an include-style path literal to a repository-relative path.
    ///
    /// A literal containing a `/` is treated as already root-relative; one
    /// without resolves to the including file's own directory. (The
    /// asymmetry matches the established include convention of the tree.)
    fn resolve_from_root(&self, literal: &str) -> String {
        if literal.contains('/') {
            return literal.to_string();
        }
        match self.path.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{literal}"),
            None => literal.to_string(),
        }
    }

    /// Whether this unit is a translation unit.
    #[must_use]
    pub fn is_source(&self) -> bool {
        self.kind == UnitKind::Source
    }

    /// Object file produced by compiling this unit (sources only).
    #[must_use]
    pub fn object_path(&self) -> String {
        format!("{}.o", self.path_without_ext)
    }

    /// Executable produced by linking this unit (sources with `main` only).
    #[must_use]
    pub fn executable_path(&self) -> &str {
        &self.path_without_ext
    }

    /// The header this source implements: the explicit override when
    /// declared, else the default `<stem>.h` naming convention.
    ///
    /// Returns `None` for headers.
    #[must_use]
    pub fn home_header_path(&self) -> Option<String> {
        if !self.is_source() {
            return None;
        }
        Some(
            self.implements_override
                .clone()
                .unwrap_or_else(|| format!("{}.h", self.path_without_ext)),
        )
    }
}
