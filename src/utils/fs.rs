//! File system utilities for safe file operations.
//!
//! This module provides the small set of file operations mkdep needs,
//! with one important guarantee: build-file replacement is **atomic**. The
//! regenerated Makefile is written to a temporary file and renamed over the
//! original, so an interrupted run can never leave a half-written file on
//! disk - the file either has the old content or the new content.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read a file to a string with a path-carrying error message.
///
/// # Arguments
///
/// * `path` - The file to read
///
/// # Errors
///
/// Returns an error naming the path if the file cannot be read.
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Atomically write bytes to a file using a write-then-rename strategy.
///
/// The content is written to a sibling `.tmp` file, synced to disk, and then
/// renamed over the destination. The destination is never in a partial state.
///
/// # Arguments
///
/// * `path` - The destination file path
/// * `content` - The raw bytes to write
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written,
/// synced, or renamed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
