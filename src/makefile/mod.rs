//! Makefile rule rendering and marker-region splicing
//!
//! Renders the autogenerated portions of the build file - per-source compile
//! rules, per-binary link rules, per-library archive rules, and the flat
//! `BINARIES`/`TESTS` target lists - and splices them into the marked
//! regions of the existing, otherwise hand-maintained Makefile.
//!
//! Everything outside the marker pairs, including the marker lines
//! themselves, stays byte-identical. The operation is idempotent: rendering
//! against its own output with an unchanged source tree reproduces the same
//! bytes, because every list in the output is explicitly ordered (rules by
//! ascending source path, dependencies self-first-then-lexicographic,
//! archives by sort key, external libraries ascending).

use anyhow::Result;
use tracing::debug;

use crate::constants::{
    ARCHIVE_COMMAND, COMPILE_COMMAND, LINK_COMMAND, LISTS_BEGIN_MARKER, LISTS_END_MARKER,
    RULES_BEGIN_MARKER, RULES_END_MARKER,
};
use crate::core::MkdepError;
use crate::graph::SourceGraph;
use crate::library::LibrarySet;
use crate::unit::SourceUnit;

/// Tab width assumed when measuring a continuation line against the budget.
const TAB_WIDTH: usize = 8;

/// The freshly rendered content of the two autogenerated regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRegions {
    /// `BINARIES`/`TESTS` target lists.
    pub lists: String,
    /// Compile, link, and archive rules.
    pub rules: String,
}

/// Render one make rule: `target:`, dependency tokens, a tab-indented
/// command line.
///
/// Dependencies wrap onto a ` \`-continued, tab-indented line whenever
/// appending the next token would push the line past `max_line_length`,
/// counting the separator overhead.
#[must_use]
pub fn format_rule(
    target: &str,
    dependencies: &[String],
    command: &str,
    max_line_length: usize,
) -> String {
    let mut content = format!("{target}:");
    let mut length = content.len();
    for dependency in dependencies {
        length += dependency.len() + 3;
        if length > max_line_length {
            content.push_str(" \\\n\t");
            content.push_str(dependency);
            length = TAB_WIDTH + dependency.len();
        } else {
            content.push(' ');
            content.push_str(dependency);
        }
    }
    content.push_str("\n\t");
    content.push_str(command);
    content.push('\n');
    content
}

/// Replace the text strictly between a begin/end marker pair.
///
/// Everything before the end of the begin marker and from the start of the
/// end marker onward is preserved byte-for-byte.
///
/// # Errors
///
/// Returns [`MkdepError::MarkerNotFound`] if either marker is absent
/// (the end marker is searched after the begin marker).
pub fn replace_section(
    content: &str,
    begin_marker: &str,
    end_marker: &str,
    section: &str,
    file: &str,
) -> Result<String> {
    let begin = content.find(begin_marker).ok_or_else(|| MkdepError::MarkerNotFound {
        marker: begin_marker.to_string(),
        file: file.to_string(),
    })? + begin_marker.len();
    let end = content[begin..].find(end_marker).map(|offset| begin + offset).ok_or_else(|| {
        MkdepError::MarkerNotFound {
            marker: end_marker.to_string(),
            file: file.to_string(),
        }
    })?;
    Ok(format!("{}{}{}", &content[..begin], section, &content[end..]))
}

/// Render both autogenerated regions from the resolved graph.
///
/// Rules are emitted for every source unit in ascending path order: a
/// compile rule always, plus a link rule when the unit defines `main`.
/// Archive rules follow, one per library in manifest order. Executables
/// are split into the `BINARIES` and `TESTS` lists by the test suffix.
///
/// # Errors
///
/// Propagates closure-resolution errors (these indicate an internal
/// inconsistency; the graph was already fully wired at build time).
pub fn render(
    graph: &SourceGraph,
    libraries: &LibrarySet,
    max_line_length: usize,
) -> Result<RenderedRegions> {
    let mut rules = String::new();
    let mut binaries: Vec<&str> = Vec::new();
    let mut tests: Vec<&str> = Vec::new();

    let mut sources: Vec<&SourceUnit> = graph.units().filter(|unit| unit.is_source()).collect();
    sources.sort_by(|a, b| a.path.cmp(&b.path));

    for unit in sources {
        let code_deps = graph.code_dependencies(&unit.path)?;
        rules.push_str(&format_rule(
            &unit.object_path(),
            &code_deps,
            COMPILE_COMMAND,
            max_line_length,
        ));

        if unit.has_main_function {
            let (artifacts, external_libs) = graph.bin_dependencies(&unit.path, libraries)?;
            let mut command = LINK_COMMAND.to_string();
            for library in &external_libs {
                command.push_str(" -l");
                command.push_str(library);
            }
            rules.push_str(&format_rule(
                unit.executable_path(),
                &artifacts,
                &command,
                max_line_length,
            ));
            if unit.is_test {
                tests.push(unit.executable_path());
            } else {
                binaries.push(unit.executable_path());
            }
        }
    }

    for library in libraries.libraries() {
        let objects: Vec<String> = library.objects.iter().cloned().collect();
        rules.push_str(&format_rule(&library.path, &objects, ARCHIVE_COMMAND, max_line_length));
    }

    debug!("Rendered {} binaries, {} tests", binaries.len(), tests.len());
    Ok(RenderedRegions {
        lists: render_target_lists(&binaries, &tests),
        rules,
    })
}

/// Render the `BINARIES` and `TESTS` variable assignments.
fn render_target_lists(binaries: &[&str], tests: &[&str]) -> String {
    format!(
        "BINARIES= \\\n\t{}\nTESTS= \\\n\t{}\n",
        binaries.join(" \\\n\t"),
        tests.join(" \\\n\t")
    )
}

/// Splice both rendered regions into the existing build-file text.
///
/// # Errors
///
/// Returns [`MkdepError::MarkerNotFound`] if any of the four markers is
/// absent. Pure with respect to `content`; the caller decides whether to
/// write the result.
pub fn splice(content: &str, regions: &RenderedRegions, file: &str) -> Result<String> {
    let content =
        replace_section(content, LISTS_BEGIN_MARKER, LISTS_END_MARKER, &regions.lists, file)?;
    replace_section(&content, RULES_BEGIN_MARKER, RULES_END_MARKER, &regions.rules, file)
}
