//! Project assembly
//!
//! Ties one generation run together: load the manifest, discover the source
//! tree, parse every file, build the include graph, and assign library
//! membership. The resulting [`Project`] is the materialized in-memory state
//! every CLI command works from - the whole graph is built before any rule
//! text is rendered, and it is discarded when the run ends. No state
//! persists across runs other than the build file itself.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::MkdepError;
use crate::discovery::discover_source_files;
use crate::graph::SourceGraph;
use crate::library::LibrarySet;
use crate::makefile::{self, RenderedRegions};
use crate::manifest::Manifest;
use crate::unit::SourceUnit;
use crate::utils::fs::read_text_file;

/// One fully materialized generation run.
pub struct Project {
    /// Project root directory (where discovery starts).
    pub root: PathBuf,
    /// Parsed manifest configuration.
    pub manifest: Manifest,
    /// The linked include graph over all discovered units.
    pub graph: SourceGraph,
    /// Library membership derived from the manifest partition.
    pub libraries: LibrarySet,
}

impl Project {
    /// Load a project: manifest, discovery, parsing, graph, libraries.
    ///
    /// `manifest_path` overrides the default `<root>/mkdep.toml` location.
    ///
    /// # Errors
    ///
    /// Any manifest, discovery, include-resolution, or library-assignment
    /// failure aborts the load; nothing on disk has been touched yet.
    pub fn load(root: &Path, manifest_path: Option<&Path>) -> Result<Self> {
        let manifest_path = manifest_path
            .map_or_else(|| root.join(crate::constants::MANIFEST_FILE), Path::to_path_buf);
        let manifest = Manifest::load(&manifest_path)?;

        let paths = discover_source_files(root)?;
        let mut units = Vec::with_capacity(paths.len());
        for path in &paths {
            let content = read_text_file(&root.join(path))?;
            units.push(SourceUnit::parse(path, &content, &manifest.external_libraries));
        }

        let graph = SourceGraph::build(units)?;
        let libraries = LibrarySet::from_manifest(&manifest.libraries, &graph)?;
        debug!("Loaded project: {} units, {} libraries", graph.len(), libraries.libraries().len());

        Ok(Self {
            root: root.to_path_buf(),
            manifest,
            graph,
            libraries,
        })
    }

    /// Path of the build file this project maintains.
    #[must_use]
    pub fn makefile_path(&self) -> PathBuf {
        self.root.join(&self.manifest.makefile)
    }

    /// Read the current build-file text.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::MakefileNotFound`] if the file does not exist.
    pub fn read_makefile(&self) -> Result<String> {
        let path = self.makefile_path();
        if !path.exists() {
            return Err(MkdepError::MakefileNotFound {
                path: self.manifest.makefile.clone(),
            }
            .into());
        }
        read_text_file(&path)
    }

    /// Render both autogenerated regions for this project.
    ///
    /// # Errors
    ///
    /// Propagates rendering failures.
    pub fn render_regions(&self) -> Result<RenderedRegions> {
        makefile::render(&self.graph, &self.libraries, self.manifest.max_line_length)
    }

    /// Produce the fully regenerated build-file text from the existing one.
    ///
    /// Pure with respect to `existing`; callers decide whether and how to
    /// write the result.
    ///
    /// # Errors
    ///
    /// Returns [`MkdepError::MarkerNotFound`] if the existing text lacks
    /// any of the four region markers.
    pub fn regenerate(&self, existing: &str) -> Result<String> {
        let regions = self.render_regions()?;
        makefile::splice(existing, &regions, &self.manifest.makefile)
    }

    /// Executable targets split into `(binaries, tests)`, each ascending.
    #[must_use]
    pub fn executables(&self) -> (Vec<String>, Vec<String>) {
        let mut binaries = Vec::new();
        let mut tests = Vec::new();
        let mut mains: Vec<&SourceUnit> = self
            .graph
            .units()
            .filter(|unit| unit.is_source() && unit.has_main_function)
            .collect();
        mains.sort_by(|a, b| a.path.cmp(&b.path));
        for unit in mains {
            if unit.is_test {
                tests.push(unit.executable_path().to_string());
            } else {
                binaries.push(unit.executable_path().to_string());
            }
        }
        (binaries, tests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const MAKEFILE: &str = "\
CXX=g++
# autogenerated-lists-begin
# autogenerated-lists-end
# autogenerated-rules-begin
# autogenerated-rules-end
";

    #[test]
    fn test_load_and_regenerate() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mkdep.toml", "");
        write(dir.path(), "Makefile", MAKEFILE);
        write(dir.path(), "hello.cpp", "#include \"hello.h\"\nint main(\n");
        write(dir.path(), "hello.h", "");

        let project = Project::load(dir.path(), None).unwrap();
        assert_eq!(project.graph.len(), 2);

        let regenerated = project.regenerate(&project.read_makefile().unwrap()).unwrap();
        assert!(regenerated.contains("hello.o: hello.cpp hello.h\n"));
        assert!(regenerated.contains("hello: hello.o\n"));
        assert!(regenerated.contains("BINARIES= \\\n\thello\n"));
    }

    #[test]
    fn test_missing_makefile() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mkdep.toml", "");
        let project = Project::load(dir.path(), None).unwrap();
        let err = project.read_makefile().unwrap_err().to_string();
        assert!(err.contains("Makefile"));
    }

    #[test]
    fn test_executables_partition() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mkdep.toml", "");
        write(dir.path(), "tool.cpp", "int main(\n");
        write(dir.path(), "tool_test.cpp", "int main(\n");
        write(dir.path(), "helper.cpp", "");

        let project = Project::load(dir.path(), None).unwrap();
        let (binaries, tests) = project.executables();
        assert_eq!(binaries, vec!["tool"]);
        assert_eq!(tests, vec!["tool_test"]);
    }
}
