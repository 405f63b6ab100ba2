//! Include-graph construction and transitive closure resolution
//!
//! This module turns the set of parsed [`SourceUnit`]s into a linked graph
//! and answers the two closure queries the rule emitter needs:
//!
//! - **Compile-time closure** ([`SourceGraph::code_dependencies`]): every
//!   file whose content must be available to compile one source file, i.e.
//!   the transitive closure over header-include edges.
//! - **Link-time closure** ([`SourceGraph::bin_dependencies`]): every object
//!   or archive that must be present to link one executable, i.e. the
//!   closure over header-include *and* header-implementation edges, mapped
//!   to `.o` paths and library archives.
//!
//! # Construction
//!
//! The graph is built in two phases: all nodes are added immutably from
//! parsed content first, then edges are resolved in a second pass. Two edge
//! kinds exist:
//!
//! - [`DependencyKind::Include`]: unit -> each unit named by one of its
//!   quoted includes. A quoted include that resolves to no discovered file
//!   is a fatal error - the graph cannot be half-wired.
//! - [`DependencyKind::Implements`]: header -> source, for every source
//!   whose home header (explicit `// IMPLEMENTS:` override, else the
//!   `<stem>.h` convention) is that header.
//!
//! Angle-bracket includes never create edges; they only contribute to a
//! unit's external-library set.
//!
//! # Determinism
//!
//! Traversal uses a visited set keyed by the unique path string, so cycles
//! from mutual includes terminate without duplicating nodes. All query
//! results are ordered self-first-then-lexicographic (closures) or fully
//! sorted (archives, external libraries), making rendered output identical
//! across runs regardless of discovery or iteration order.

use anyhow::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::core::MkdepError;
use crate::library::LibrarySet;
use crate::unit::SourceUnit;

/// Edge kinds in the source graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// The origin unit textually includes the target unit.
    Include,
    /// The target source implements the origin header.
    Implements,
}

/// The linked include graph over all discovered units.
///
/// Backed by a directed graph plus a path -> node map; the path string is
/// the stable unique key for every unit.
#[derive(Debug)]
pub struct SourceGraph {
    graph: DiGraph<SourceUnit, DependencyKind>,
    node_map: HashMap<String, NodeIndex>,
}

impl SourceGraph {
    /// Build the graph from parsed units.
    ///
    /// Phase one adds every unit as a node; phase two resolves each unit's
    /// quoted includes to `Include` edges and each source's home header to
    /// an `Implements` edge (skipped when the home header is not among the
    /// discovered units - a source without a header is normal).
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::IncludeNotResolved`] when a quoted include
    /// names a file that was not discovered.
    pub fn build(units: Vec<SourceUnit>) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for unit in units {
            let path = unit.path.clone();
            let index = graph.add_node(unit);
            node_map.insert(path, index);
        }

        let mut source_graph = Self { graph, node_map };
        source_graph.resolve_edges()?;
        debug!(
            "Built source graph: {} units, {} edges",
            source_graph.graph.node_count(),
            source_graph.graph.edge_count()
        );
        Ok(source_graph)
    }

    /// Wire direct edges; nothing here computes a closure.
    fn resolve_edges(&mut self) -> Result<()> {
        let mut edges: Vec<(NodeIndex, NodeIndex, DependencyKind)> = Vec::new();

        for index in self.graph.node_indices() {
            let unit = &self.graph[index];

            for include in &unit.quoted_include_paths {
                let target = self.node_map.get(include).copied().ok_or_else(|| {
                    MkdepError::IncludeNotResolved {
                        include: include.clone(),
                        referenced_by: unit.path.clone(),
                    }
                })?;
                edges.push((index, target, DependencyKind::Include));
            }

            if let Some(header_path) = unit.home_header_path()
                && let Some(&header) = self.node_map.get(&header_path)
            {
                edges.push((header, index, DependencyKind::Implements));
            }
        }

        for (from, to, kind) in edges {
            // Repeated includes of the same header collapse to one edge.
            if !self
                .graph
                .edges(from)
                .any(|edge| edge.target() == to && *edge.weight() == kind)
            {
                self.graph.add_edge(from, to, kind);
            }
        }
        Ok(())
    }

    /// Look up a unit by path.
    #[must_use]
    pub fn unit(&self, path: &str) -> Option<&SourceUnit> {
        self.node_map.get(path).map(|&index| &self.graph[index])
    }

    /// Iterate over all units.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.graph.node_indices().map(|index| &self.graph[index])
    }

    /// Number of units in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph contains no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Paths of the units directly reachable from `path` over the given
    /// edge kinds, sorted ascending.
    #[must_use]
    pub fn direct_dependencies(&self, path: &str, follow_implements: bool) -> Vec<&str> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };
        let mut neighbors: Vec<&str> = self
            .graph
            .edges(index)
            .filter(|edge| follow_implements || *edge.weight() == DependencyKind::Include)
            .map(|edge| self.graph[edge.target()].path.as_str())
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Depth-first traversal from `start`, yielding `start` first.
    ///
    /// The visited set is keyed by path, so mutual or circular includes
    /// terminate and contribute each unit exactly once.
    fn dfs(&self, start: NodeIndex, follow_implements: bool) -> Vec<NodeIndex> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut todo = vec![start];
        let mut order = Vec::new();
        visited.insert(self.graph[start].path.as_str());

        while let Some(node) = todo.pop() {
            order.push(node);
            for edge in self.graph.edges(node) {
                if !follow_implements && *edge.weight() != DependencyKind::Include {
                    continue;
                }
                let target = edge.target();
                if visited.insert(self.graph[target].path.as_str()) {
                    todo.push(target);
                }
            }
        }
        order
    }

    fn node_index(&self, path: &str) -> Result<NodeIndex> {
        self.node_map.get(path).copied().ok_or_else(|| {
            MkdepError::UnitNotFound {
                path: path.to_string(),
            }
            .into()
        })
    }

    /// Compile-time closure of one unit: every file needed to compile it.
    ///
    /// Traverses only include edges. The result lists the unit's own path
    /// first, followed by all other reachable paths in ascending order -
    /// stable regardless of traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::UnitNotFound`] for an unknown path.
    pub fn code_dependencies(&self, path: &str) -> Result<Vec<String>> {
        let start = self.node_index(path)?;
        let order = self.dfs(start, false);
        let mut deps: Vec<String> =
            order.iter().map(|&node| self.graph[node].path.clone()).collect();
        deps[1..].sort_unstable();
        Ok(deps)
    }

    /// Link-time closure of one unit: the artifacts needed to link it.
    ///
    /// Traverses include and implementation edges. Every visited unit
    /// contributes exactly one of:
    ///
    /// - its owning library's archive, when it has one (never its raw
    ///   object - archive membership subsumes the object), or
    /// - its object path, when it is a source, or
    /// - nothing, when it is an unowned header;
    ///
    /// and its external-library names accumulate into a running set.
    ///
    /// Returns `(artifacts, external_libs)`: the unit's own object first,
    /// the other objects ascending, then archive paths by ascending
    /// `(sort_key, path)`; and the sorted external library names.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::UnitNotFound`] for an unknown path.
    pub fn bin_dependencies(
        &self,
        path: &str,
        libraries: &LibrarySet,
    ) -> Result<(Vec<String>, Vec<String>)> {
        let start = self.node_index(path)?;
        let mut objects: Vec<String> = Vec::new();
        let mut archives: BTreeSet<(i64, &str)> = BTreeSet::new();
        let mut external_libs: BTreeSet<&str> = BTreeSet::new();

        for node in self.dfs(start, true) {
            let unit = &self.graph[node];
            if let Some(library) = libraries.owner(&unit.path) {
                archives.insert((library.sort_key, library.path.as_str()));
            } else if unit.is_source() {
                objects.push(unit.object_path());
            }
            external_libs.extend(unit.external_library_refs.iter().map(String::as_str));
        }

        if objects.len() > 1 {
            objects[1..].sort_unstable();
        }
        objects.extend(archives.into_iter().map(|(_, archive)| archive.to_string()));
        Ok((objects, external_libs.into_iter().map(str::to_string).collect()))
    }

    /// Human-readable include tree rooted at one unit.
    ///
    /// Children are sorted ascending; a unit reached again through a cycle
    /// is shown once with a circular-reference note.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::UnitNotFound`] for an unknown path.
    pub fn to_tree_string(&self, path: &str) -> Result<String> {
        self.node_index(path)?;
        let mut result = String::new();
        let mut visited = HashSet::new();
        self.build_tree_string(path, &mut result, "", true, &mut visited);
        Ok(result)
    }

    fn build_tree_string<'a>(
        &'a self,
        path: &'a str,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<&'a str>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        result.push_str(&format!("{prefix}{connector}{path}\n"));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if !visited.insert(path) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        let children = self.direct_dependencies(path, false);
        for (i, child) in children.iter().enumerate() {
            let is_last_child = i == children.len() - 1;
            self.build_tree_string(child, result, &child_prefix, is_last_child, visited);
        }
    }
}
