//! Error types for note generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a note.
#[derive(Debug, Error)]
pub enum NotesError {
    /// No API key configured or in the environment.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// I/O error reading the audio or writing the note.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure talking to the API.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with an error status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// The response contained no text.
    #[error("Model returned no text{}", .finish_reason.as_ref().map(|r| format!(" (finish reason: {})", r)).unwrap_or_default())]
    EmptyResponse { finish_reason: Option<String> },
}
