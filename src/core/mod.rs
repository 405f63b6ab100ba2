//! Core types and error handling for mkdep
//!
//! This module forms the foundation of mkdep's type system. It defines the
//! error contracts used throughout the codebase:
//!
//! - **Strongly-typed errors** ([`MkdepError`]) for precise error handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions for CLI users
//! - **Automatic error conversion** from common standard library errors
//!
//! # Design Principles
//!
//! Every operation that can fail returns a [`Result`] with meaningful error
//! information, and every fatal condition aborts the whole run before any
//! output is written - the build file on disk is never left half-updated.

pub mod error;

pub use error::{ErrorContext, MkdepError, user_friendly_error};
