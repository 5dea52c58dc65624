//! Per-item note generation: the work a single worker performs.
//!
//! Reads one audio file, sends it inline to the Gemini `generateContent`
//! endpoint together with the note-taking prompt, and writes the returned
//! text next to the input (`lesson.opus` -> `lesson.md`).
//!
//! # Example
//!
//! ```ignore
//! use notebatch_core::notes::{GeminiClient, GeminiConfig, NoteProcessor};
//!
//! let config = GeminiConfig::default();
//! let client = GeminiClient::from_config(&config)?;
//! let processor = NoteProcessor::new(config, client);
//! let written = processor.process(Path::new("/data/lesson.opus")).await?;
//! ```

mod client;
mod config;
mod error;
mod processor;
mod traits;
mod types;

pub use client::GeminiClient;
pub use config::{GeminiConfig, API_KEY_ENV, DEFAULT_PROMPT};
pub use error::NotesError;
pub use processor::{output_path_for, NoteProcessor};
pub use traits::ContentGenerator;
pub use types::{Blob, Content, GenerateContentRequest, Part};
