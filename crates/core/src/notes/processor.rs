//! Turns one audio file into a note file.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use super::config::GeminiConfig;
use super::error::NotesError;
use super::traits::ContentGenerator;
use super::types::GenerateContentRequest;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Path of the note written for `input`: same directory and stem, new extension.
pub fn output_path_for(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Generates a note for a single audio file.
pub struct NoteProcessor<G: ContentGenerator> {
    config: GeminiConfig,
    generator: G,
}

impl<G: ContentGenerator> NoteProcessor<G> {
    pub fn new(config: GeminiConfig, generator: G) -> Self {
        Self { config, generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Reads `input`, asks the generator for a note and writes it next to
    /// the input. Nothing is written unless generation succeeds.
    pub async fn process(&self, input: &Path) -> Result<PathBuf, NotesError> {
        let input = std::path::absolute(input)?;
        info!(path = %input.display(), "Processing file");

        let metadata = match tokio::fs::metadata(&input).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(NotesError::InputNotFound { path: input }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NotesError::InputNotFound { path: input });
            }
            Err(e) => return Err(e.into()),
        };

        let size_mb = metadata.len() as f64 / BYTES_PER_MB;
        info!(size_mb = %format!("{:.2}", size_mb), "Audio file size");
        if size_mb > self.config.size_warning_mb {
            warn!(
                size_mb = %format!("{:.2}", size_mb),
                limit_mb = self.config.size_warning_mb,
                "File is close to or above the inline upload limit, the request may fail"
            );
        }

        let audio = tokio::fs::read(&input).await?;
        let request = GenerateContentRequest::audio_with_prompt(
            &self.config.mime_type,
            STANDARD.encode(&audio),
            &self.config.prompt,
        );

        if tracing::enabled!(tracing::Level::DEBUG) {
            let payload = serde_json::to_string_pretty(&request.redacted())
                .map_err(|e| NotesError::Json(e.to_string()))?;
            debug!(model = %self.generator.model(), "Request payload:\n{}", payload);
        }

        info!(model = %self.generator.model(), "Uploading audio and generating note");
        let text = self.generator.generate(&request).await?;
        debug!("Generated note:\n{}", text);

        let output = output_path_for(&input, &self.config.output_extension);
        tokio::fs::write(&output, text.as_bytes()).await?;
        info!(path = %output.display(), chars = text.chars().count(), "Note saved");

        Ok(output)
    }
}
