//! Global constants used throughout the mkdep codebase.
//!
//! This module contains the marker strings, command templates, file-name
//! conventions, and formatting defaults that are shared across multiple
//! modules. Defining them centrally improves maintainability and makes
//! magic strings more discoverable.

/// Manifest file name searched for at the project root.
pub const MANIFEST_FILE: &str = "mkdep.toml";

/// Default build file rewritten by `mkdep update`.
pub const DEFAULT_MAKEFILE: &str = "Makefile";

/// Begin marker for the autogenerated target-lists region.
///
/// Marker lines themselves are never rewritten; only the text strictly
/// between a begin/end pair is owned by the generator.
pub const LISTS_BEGIN_MARKER: &str = "# autogenerated-lists-begin\n";

/// End marker for the autogenerated target-lists region.
pub const LISTS_END_MARKER: &str = "# autogenerated-lists-end\n";

/// Begin marker for the autogenerated rules region.
pub const RULES_BEGIN_MARKER: &str = "# autogenerated-rules-begin\n";

/// End marker for the autogenerated rules region.
pub const RULES_END_MARKER: &str = "# autogenerated-rules-end\n";

/// Command template for single-file compile rules.
pub const COMPILE_COMMAND: &str = "$(CXX) $(CXXFLAGS) -c -o $@ $<";

/// Command template for executable link rules.
///
/// External library flags (`-lcurl`, ...) are appended after the template.
pub const LINK_COMMAND: &str = "$(CXX) -o $@ $^";

/// Command template for static archive rules (replace, create, symbol table).
pub const ARCHIVE_COMMAND: &str = "ar rcs $@ $^";

/// Maximum column budget for a dependency line before wrapping onto a
/// tab-indented continuation line.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 120;

/// File extension identifying header units.
pub const HEADER_EXTENSION: &str = "h";

/// File extension identifying source units.
pub const SOURCE_EXTENSION: &str = "cpp";

/// Stem suffix identifying test sources (e.g. `parser_test.cpp`).
pub const TEST_SUFFIX: &str = "_test";

/// Version-control metadata directory skipped during discovery.
pub const VCS_DIR: &str = ".git";

/// Baseline mapping from well-known angle-bracket headers to linker library
/// names. Angle includes absent from this table produce no link edge.
///
/// The manifest's `[external-libraries]` table replaces this default when
/// present; extending the mapping is a configuration change, not a code one.
pub const DEFAULT_EXTERNAL_LIBRARIES: &[(&str, &str)] =
    &[("curl/curl.h", "curl"), ("re2/re2.h", "re2"), ("sqlite3.h", "sqlite3")];
