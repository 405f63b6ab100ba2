//! Source-tree discovery
//!
//! Enumerates the header and source files a generation run operates on:
//! every `.h`/`.cpp` file under the project root, excluding version-control
//! metadata. Paths are yielded as normalized repository-relative strings
//! with forward-slash separators - those strings are the unique keys for
//! the whole dependency graph, so normalization happens exactly once, here.
//!
//! The result is sorted ascending. Nothing downstream depends on that order
//! for correctness (all rendered output is explicitly sorted), but it keeps
//! logs and iteration stable.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::{HEADER_EXTENSION, SOURCE_EXTENSION, VCS_DIR};

/// Recursively enumerate header and source files under `root`.
///
/// Skips the `.git` directory, selects files whose extension is `.h` or
/// `.cpp`, and returns their root-relative forward-slash paths in ascending
/// order.
///
/// # Arguments
///
/// * `root` - Project root directory to walk
///
/// # Errors
///
/// Returns an error if the walk fails (unreadable directory, broken
/// permissions) or if an entry cannot be made root-relative.
pub fn discover_source_files(root: &Path) -> Result<Vec<String>> {
    let mut paths = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != VCS_DIR);

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let extension = entry.path().extension().and_then(|ext| ext.to_str());
        if !matches!(extension, Some(HEADER_EXTENSION) | Some(SOURCE_EXTENSION)) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("Path outside root: {}", entry.path().display()))?;
        paths.push(normalize_relative_path(relative));
    }

    paths.sort();
    debug!("Discovered {} source files under {}", paths.len(), root.display());
    Ok(paths)
}

/// Join a relative path's components with forward slashes.
///
/// Windows backslash separators would otherwise leak into graph keys and
/// rendered Makefile text.
fn normalize_relative_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discovers_only_headers_and_sources() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wiki.cpp");
        touch(dir.path(), "wiki.h");
        touch(dir.path(), "notes.md");
        touch(dir.path(), "Makefile.bak");
        touch(dir.path(), "util/date.h");

        let paths = discover_source_files(dir.path()).unwrap();
        assert_eq!(paths, vec!["util/date.h", "wiki.cpp", "wiki.h"]);
    }

    #[test]
    fn test_skips_vcs_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "main.cpp");
        touch(dir.path(), ".git/hooks/sample.cpp");

        let paths = discover_source_files(dir.path()).unwrap();
        assert_eq!(paths, vec!["main.cpp"]);
    }

    #[test]
    fn test_paths_are_sorted_and_forward_slashed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/impl.cpp");
        touch(dir.path(), "a/impl.cpp");
        touch(dir.path(), "a/deep/nested.h");

        let paths = discover_source_files(dir.path()).unwrap();
        assert_eq!(paths, vec!["a/deep/nested.h", "a/impl.cpp", "b/impl.cpp"]);
        assert!(paths.iter().all(|p| !p.contains('\\')));
    }
}
