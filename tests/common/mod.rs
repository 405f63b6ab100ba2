//! Shared test utilities for mkdep integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A Makefile skeleton with all four marker lines and some hand-written
/// text around them.
pub const MAKEFILE_SKELETON: &str = "\
CXX=g++
CXXFLAGS=-std=c++17 -Wall

# autogenerated-lists-begin
# autogenerated-lists-end

all: $(BINARIES)

test: $(TESTS)

# autogenerated-rules-begin
# autogenerated-rules-end

.PHONY: all test
";

/// A temporary project directory with helpers for writing fixture files
/// and invoking the mkdep binary against it.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Create an empty project directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Create a project with an empty (all-defaults) manifest and the
    /// standard Makefile skeleton.
    pub fn with_skeleton() -> Self {
        let project = Self::new();
        project.write("mkdep.toml", "");
        project.write("Makefile", MAKEFILE_SKELETON);
        project
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under the project root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write fixture file");
    }

    /// Read a file under the project root.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read fixture file")
    }

    /// A command invoking the mkdep binary with `--root` pointed here.
    pub fn mkdep(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("mkdep").expect("mkdep binary");
        cmd.arg("--root").arg(self.dir.path());
        cmd.args(args);
        cmd
    }
}
