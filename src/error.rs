//! Unified error types for decldiff.
//!
//! This module provides the error hierarchy for the library. Each variant
//! carries the operation it failed in, for user-facing messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for decldiff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeclDiffError {
    /// A caller passed an argument that violates the input contract
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// Errors while producing a structural tree
    #[error("Failed to parse source while {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors resolving build configurations
    #[error("Configuration resolution failed while {context}: {source}")]
    Configuration {
        context: String,
        #[source]
        source: ConfigurationErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON tree: {0}")]
    InvalidJson(String),

    #[error("Unbalanced conditional directive at line {line}: {message}")]
    UnbalancedDirective { line: usize, message: String },

    #[error("{0}")]
    Diagnostics(String),
}

/// Specific configuration error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigurationErrorKind {
    #[error("Unknown configuration '{id}' (supported: {supported})")]
    Unknown { id: String, supported: String },

    #[error("Configuration '{0}' requested more than once")]
    Duplicate(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for decldiff operations
pub type Result<T> = std::result::Result<T, DeclDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DeclDiffError {
    /// Create an input-contract violation
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an error for an unrecognized configuration identifier
    pub fn unknown_configuration(id: impl Into<String>, supported: &[&str]) -> Self {
        Self::Configuration {
            context: "resolving target configurations".to_string(),
            source: ConfigurationErrorKind::Unknown {
                id: id.into(),
                supported: supported.join(", "),
            },
        }
    }

    /// Create a configuration error
    pub fn configuration(context: impl Into<String>, source: ConfigurationErrorKind) -> Self {
        Self::Configuration {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DeclDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DeclDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("JSON deserialization", ParseErrorKind::InvalidJson(err.to_string()))
    }
}
