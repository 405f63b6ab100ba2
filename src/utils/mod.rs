//! Cross-platform utility functions for mkdep
//!
//! Currently this module hosts file-system helpers; see [`fs`].

pub mod fs;

pub use fs::{atomic_write, read_text_file};
