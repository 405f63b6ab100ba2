//! Error handling for mkdep
//!
//! This module provides the error types and user-friendly error reporting for
//! the Makefile generator. The error system is designed around two principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`MkdepError`] - Enumerated error types for all fatal conditions
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Taxonomy
//!
//! Every [`MkdepError`] is a fatal configuration or repository-state defect:
//! the run aborts immediately and the Makefile on disk is left unmodified.
//! There are no retries anywhere - generation is a deterministic, idempotent
//! batch computation, so a failure is something to fix, not something
//! transient.
//!
//! Conditions that are *not* errors (silent skips): lines matching none of the
//! recognized directive forms, and angle-bracket includes absent from the
//! external-library table.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mkdep::core::{MkdepError, user_friendly_error};
//!
//! fn resolve() -> Result<(), MkdepError> {
//!     Err(MkdepError::IncludeNotResolved {
//!         include: "parser.h".to_string(),
//!         referenced_by: "parser.cpp".to_string(),
//!     })
//! }
//!
//! if let Err(e) = resolve() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // Shows colored error with suggestions
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for mkdep operations
///
/// Each variant represents a specific fatal failure mode and carries the
/// offending path or marker so the message can point directly at the defect.
#[derive(Error, Debug, Clone)]
pub enum MkdepError {
    /// Manifest file (mkdep.toml) not found at the project root
    #[error("Manifest file mkdep.toml not found in project root")]
    ManifestNotFound,

    /// Manifest parsing error
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Manifest validation error
    #[error("Manifest validation failed: {reason}")]
    ManifestValidationError {
        /// Reason why manifest validation failed
        reason: String,
    },

    /// A quoted include could not be resolved to any discovered file
    ///
    /// Every `#include "..."` must name a file in the source tree. A miss
    /// usually means a typo in the include line, a file that was deleted
    /// without updating its includers, or a file extension outside the
    /// discovery convention.
    #[error("Cannot resolve include \"{include}\" referenced by {referenced_by}")]
    IncludeNotResolved {
        /// The resolved repository-relative path that was looked up
        include: String,
        /// Path of the file containing the include directive
        referenced_by: String,
    },

    /// A unit with a main function was selected for archive membership
    ///
    /// A linkable binary entry point cannot be bundled into a static
    /// library; the library partition in the manifest must exclude it.
    #[error("File with main function added to library '{library}': {path}")]
    MainFunctionInLibrary {
        /// Path of the offending source file
        path: String,
        /// Archive path of the library it was selected for
        library: String,
    },

    /// A required autogenerated-region marker is missing from the build file
    #[error("Marker {marker:?} not found in {file}")]
    MarkerNotFound {
        /// The literal marker line that was searched for
        marker: String,
        /// Path of the build file that was scanned
        file: String,
    },

    /// The build file itself is missing
    #[error("Build file not found: {path}")]
    MakefileNotFound {
        /// Expected path of the build file
        path: String,
    },

    /// A path named on the command line is not a discovered unit
    #[error("No source or header file found at '{path}'")]
    UnitNotFound {
        /// The path that was requested
        path: String,
    },

    /// File already exists (init without --force)
    #[error("File already exists: {path}")]
    AlreadyExists {
        /// Path of the existing file
        path: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl From<std::io::Error> for MkdepError {
    fn from(err: std::io::Error) -> Self {
        Self::Other {
            message: format!("IO error: {err}"),
        }
    }
}

impl From<toml::de::Error> for MkdepError {
    fn from(err: toml::de::Error) -> Self {
        Self::Other {
            message: format!("TOML parsing error: {err}"),
        }
    }
}

/// Error context wrapper providing user-friendly messages and suggestions
///
/// Wraps a [`MkdepError`] with optional details (why it happened) and a
/// suggestion (what to do about it). The CLI entry point displays the
/// context with terminal colors before exiting non-zero.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: MkdepError,
    /// Actionable suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Additional details explaining the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`MkdepError`]
    #[must_use]
    pub const fn new(error: MkdepError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps. They are displayed in green
    /// in the terminal to draw attention.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details provide context about why the error occurred. They are
    /// displayed in yellow, less prominent than the error itself.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions
///
/// This is the main entry point for converting arbitrary errors into
/// user-friendly messages for CLI display. [`MkdepError`] variants get
/// tailored suggestions; other errors are wrapped with the full anyhow
/// context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(mkdep_error) = error.downcast_ref::<MkdepError>() {
        return create_error_context(mkdep_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(MkdepError::Other {
            message: format!("IO error: {io_error}"),
        });
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => context
                .with_suggestion("Check file ownership and permissions in the project tree"),
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => context,
        };
    }

    // Generic fallback: preserve the anyhow context chain in the message.
    ErrorContext::new(MkdepError::Other {
        message: format!("{error:#}"),
    })
}

/// Attach the standard suggestion and details for each [`MkdepError`] variant
fn create_error_context(error: MkdepError) -> ErrorContext {
    match &error {
        MkdepError::ManifestNotFound => ErrorContext::new(error.clone())
            .with_suggestion("Run 'mkdep init' to create a starter mkdep.toml")
            .with_details("mkdep expects mkdep.toml next to the Makefile it maintains"),
        MkdepError::ManifestParseError { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error.clone())
                .with_suggestion("Fix the TOML syntax error in the manifest")
                .with_details(reason)
        }
        MkdepError::IncludeNotResolved { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Check the include line for typos, or remove it if the file no longer exists",
            )
            .with_details(
                "Every quoted include must resolve to a .h or .cpp file in the source tree; \
                 includes without a '/' resolve relative to the including file's directory",
            ),
        MkdepError::MainFunctionInLibrary { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Exclude the file from the library's roots in mkdep.toml, \
                 or add its prefix to the library's exclude list",
            ),
        MkdepError::MarkerNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Add the four autogenerated-region marker lines to the Makefile \
                 (lists begin/end, rules begin/end)",
            )
            .with_details("mkdep only rewrites the text between marker pairs"),
        MkdepError::MakefileNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Create the Makefile with the four marker lines, then re-run"),
        MkdepError::UnitNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Pass a repository-relative path to a discovered .h or .cpp file"),
        _ => ErrorContext::new(error.clone()),
    }
}
