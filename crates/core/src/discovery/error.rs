//! Error types for the discovery module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering work items.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The current working directory could not be resolved.
    #[error("Cannot resolve working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// The root path does not exist.
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The root path exists but is not a directory.
    #[error("Root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The glob pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A work item path was not absolute.
    #[error("Work item path must be absolute: {path}")]
    RelativePath { path: PathBuf },

    /// Traversal failed somewhere below the root.
    #[error("Failed to traverse {path}: {reason}")]
    Walk { path: PathBuf, reason: String },
}

impl DiscoveryError {
    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
