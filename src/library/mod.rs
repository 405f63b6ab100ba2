//! Static-archive membership bookkeeping
//!
//! Groups selected units into named archives with exclusivity and ordering
//! rules. Ownership is exclusive and irrevocable for the run: a unit belongs
//! to at most one [`Library`], claimed in manifest order, and the claim is
//! checked before it is set so re-entering an already-owned unit is a no-op
//! rather than a reassignment.
//!
//! A recursive library claims the include/implementation closure of every
//! unit matched by its roots; a non-recursive one claims only the matched
//! units themselves. Both modes refuse units with a `main` function - a
//! linkable entry point cannot be archived, and hitting one is a fatal
//! configuration error that aborts the run.

use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::core::MkdepError;
use crate::graph::SourceGraph;
use crate::manifest::LibrarySpec;
use crate::unit::SourceUnit;

/// One static archive: its output path, link-order position, and the object
/// files bundled into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// Archive output path.
    pub path: String,
    /// Position among link-line archives; lower keys sort first.
    pub sort_key: i64,
    /// Object files bundled into this archive, sorted.
    pub objects: BTreeSet<String>,
}

/// All libraries of a run plus the exclusive unit -> library ownership map.
#[derive(Debug, Default)]
pub struct LibrarySet {
    libraries: Vec<Library>,
    owners: HashMap<String, usize>,
}

impl LibrarySet {
    /// Assign units to libraries according to the manifest partition.
    ///
    /// Specs are processed in manifest order; within one spec, units are
    /// visited in ascending path order, so the resulting ownership is
    /// independent of discovery order. Test sources are never claimed.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::MainFunctionInLibrary`] if the partition
    /// selects a unit that defines `main`.
    pub fn from_manifest(specs: &[LibrarySpec], graph: &SourceGraph) -> Result<Self> {
        let mut set = Self::default();
        for spec in specs {
            set.libraries.push(Library {
                path: spec.path.clone(),
                sort_key: spec.sort_key,
                objects: BTreeSet::new(),
            });
        }

        let mut paths: Vec<&str> = graph.units().map(|unit| unit.path.as_str()).collect();
        paths.sort_unstable();

        for (library, spec) in specs.iter().enumerate() {
            for &path in &paths {
                let unit = graph.unit(path).expect("path came from the graph");
                if !spec.matches(path, unit.is_test) || set.owners.contains_key(path) {
                    continue;
                }
                if spec.recursive {
                    set.assign_closure(library, graph, path)?;
                } else {
                    set.assign_unit(library, unit)?;
                }
            }
            debug!(
                "Library {} owns {} objects",
                spec.path,
                set.libraries[library].objects.len()
            );
        }
        Ok(set)
    }

    /// Claim one unit for a library.
    ///
    /// Fails before any state is touched when the unit defines `main`.
    fn assign_unit(&mut self, library: usize, unit: &SourceUnit) -> Result<()> {
        if unit.has_main_function {
            return Err(MkdepError::MainFunctionInLibrary {
                path: unit.path.clone(),
                library: self.libraries[library].path.clone(),
            }
            .into());
        }
        self.owners.insert(unit.path.clone(), library);
        if unit.is_source() {
            self.libraries[library].objects.insert(unit.object_path());
        }
        Ok(())
    }

    /// Claim a unit and its include/implementation closure.
    ///
    /// Check-then-set: a unit already owned (by this or any other library)
    /// is skipped and not descended into, which keeps the walk idempotent
    /// and the ownership exclusive even across overlapping roots.
    fn assign_closure(&mut self, library: usize, graph: &SourceGraph, root: &str) -> Result<()> {
        let mut todo = vec![root.to_string()];
        while let Some(path) = todo.pop() {
            if self.owners.contains_key(&path) {
                continue;
            }
            let Some(unit) = graph.unit(&path) else {
                continue;
            };
            self.assign_unit(library, unit)?;
            for child in graph.direct_dependencies(&path, true) {
                if !self.owners.contains_key(child) {
                    todo.push(child.to_string());
                }
            }
        }
        Ok(())
    }

    /// The library owning a unit, if any.
    #[must_use]
    pub fn owner(&self, path: &str) -> Option<&Library> {
        self.owners.get(path).map(|&index| &self.libraries[index])
    }

    /// All libraries, in manifest order.
    #[must_use]
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn graph(files: &[(&str, &str)]) -> SourceGraph {
        let table: BTreeMap<String, String> = BTreeMap::new();
        SourceGraph::build(
            files
                .iter()
                .map(|(path, content)| crate::unit::SourceUnit::parse(path, content, &table))
                .collect(),
        )
        .unwrap()
    }

    fn spec(path: &str, sort_key: i64, roots: &[&str], recursive: bool) -> LibrarySpec {
        LibrarySpec {
            path: path.to_string(),
            sort_key,
            roots: roots.iter().map(|&root| root.to_string()).collect(),
            exclude: Vec::new(),
            recursive,
        }
    }

    #[test]
    fn test_direct_assignment_collects_objects() {
        let graph = graph(&[
            ("util/date.h", ""),
            ("util/date.cpp", "#include \"date.h\"\n"),
            ("util/date_test.cpp", "#include \"date.h\"\nint main(\n"),
        ]);
        let specs = [spec("util/libutil.a", 1, &["util/"], false)];
        let set = LibrarySet::from_manifest(&specs, &graph).unwrap();

        let library = &set.libraries()[0];
        assert_eq!(library.objects.iter().collect::<Vec<_>>(), vec!["util/date.o"]);
        // The test source stays out of the archive entirely.
        assert!(set.owner("util/date_test.cpp").is_none());
        // The header is owned but contributes no object.
        assert!(set.owner("util/date.h").is_some());
    }

    #[test]
    fn test_recursive_assignment_claims_closure() {
        let graph = graph(&[
            ("core/api.h", "#include \"shared/base.h\"\n"),
            ("core/api.cpp", "#include \"api.h\"\n"),
            ("shared/base.h", ""),
            ("shared/base.cpp", "#include \"base.h\"\n"),
        ]);
        let specs = [spec("core/libcore.a", 1, &["core/"], true)];
        let set = LibrarySet::from_manifest(&specs, &graph).unwrap();

        // The closure reaches shared/ through the include and implements edges.
        assert_eq!(
            set.libraries()[0].objects.iter().collect::<Vec<_>>(),
            vec!["core/api.o", "shared/base.o"]
        );
        assert!(set.owner("shared/base.h").is_some());
    }

    #[test]
    fn test_ownership_is_exclusive_in_manifest_order() {
        let graph = graph(&[
            ("a/user.h", "#include \"shared/base.h\"\n"),
            ("a/user.cpp", "#include \"user.h\"\n"),
            ("b/other.h", "#include \"shared/base.h\"\n"),
            ("b/other.cpp", "#include \"other.h\"\n"),
            ("shared/base.h", ""),
            ("shared/base.cpp", "#include \"base.h\"\n"),
        ]);
        let specs = [
            spec("a/liba.a", 1, &["a/"], true),
            spec("b/libb.a", 2, &["b/"], true),
        ];
        let set = LibrarySet::from_manifest(&specs, &graph).unwrap();

        // shared/ was reachable from both; the first library in manifest
        // order claimed it and the second never reprocessed it.
        assert_eq!(set.owner("shared/base.cpp").unwrap().path, "a/liba.a");
        assert!(set.libraries()[0].objects.contains("shared/base.o"));
        assert!(!set.libraries()[1].objects.contains("shared/base.o"));
    }

    #[test]
    fn test_main_function_rejected() {
        let graph = graph(&[("tools/run.cpp", "int main(\n")]);
        let specs = [spec("tools/libtools.a", 1, &["tools/"], true)];
        let err = LibrarySet::from_manifest(&specs, &graph).unwrap_err().to_string();
        assert!(err.contains("tools/run.cpp"));
        assert!(err.contains("libtools.a"));
    }

    #[test]
    fn test_main_function_rejected_through_closure() {
        // A root without main that includes a header implemented by a file
        // with main: the closure walk must hit the fatal error too, even
        // though the entry point itself is excluded from direct selection.
        let graph = graph(&[
            ("lib/helper.cpp", "#include \"entry.h\"\n"),
            ("lib/entry.h", ""),
            ("lib/entry.cpp", "#include \"entry.h\"\nint main(\n"),
        ]);
        let mut with_exclude = spec("lib/lib.a", 1, &["lib/"], true);
        with_exclude.exclude = vec!["lib/entry".to_string()];
        assert!(LibrarySet::from_manifest(&[with_exclude], &graph).is_err());
    }

    #[test]
    fn test_owned_units_contribute_archive_not_object() {
        let graph = graph(&[
            ("tool.cpp", "#include \"core/api.h\"\nint main(\n"),
            ("core/api.h", ""),
            ("core/api.cpp", "#include \"api.h\"\n"),
        ]);
        let specs = [spec("core/libcore.a", 1, &["core/"], true)];
        let set = LibrarySet::from_manifest(&specs, &graph).unwrap();

        let (artifacts, _) = graph.bin_dependencies("tool.cpp", &set).unwrap();
        assert_eq!(artifacts, vec!["tool.o", "core/libcore.a"]);
    }

    #[test]
    fn test_link_line_archive_order_follows_sort_key() {
        let graph = graph(&[
            ("tool.cpp", "#include \"zz/api.h\"\n#include \"aa/api.h\"\nint main(\n"),
            ("zz/api.h", ""),
            ("zz/api.cpp", "#include \"api.h\"\n"),
            ("aa/api.h", ""),
            ("aa/api.cpp", "#include \"api.h\"\n"),
        ]);
        // Manifest order and path order both disagree with the sort keys;
        // the sort keys win on the link line.
        let specs = [
            spec("aa/libaa.a", 2, &["aa/"], true),
            spec("zz/libzz.a", 1, &["zz/"], true),
        ];
        let set = LibrarySet::from_manifest(&specs, &graph).unwrap();

        let (artifacts, _) = graph.bin_dependencies("tool.cpp", &set).unwrap();
        assert_eq!(artifacts, vec!["tool.o", "zz/libzz.a", "aa/libaa.a"]);
    }
}
