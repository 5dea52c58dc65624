//! Error types for the worker module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while launching or awaiting a worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Worker program not found.
    #[error("worker program not found: {program}")]
    ProgramNotFound { program: PathBuf },

    /// Worker process could not be started.
    #[error("failed to start {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while awaiting the worker.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker ended without reporting an exit status.
    #[error("worker aborted before reporting an exit status")]
    Aborted,
}

impl WorkerError {
    /// Whether the worker never started.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::ProgramNotFound { .. } | Self::Launch { .. })
    }
}
