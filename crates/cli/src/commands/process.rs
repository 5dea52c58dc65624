//! Process command - the per-item worker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use notebatch_core::{load_config, GeminiClient, NoteProcessor};

/// Arguments for the process command.
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Audio file to convert.
    pub file: PathBuf,
}

/// Execute the process command.
///
/// # Errors
///
/// Returns an error if no API key is available, the file cannot be read,
/// the API call fails, or the note cannot be written.
pub async fn execute(args: ProcessArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let client = GeminiClient::from_config(&config.gemini).context("Cannot create Gemini client")?;
    let processor = NoteProcessor::new(config.gemini, client);

    let output = processor
        .process(&args.file)
        .await
        .with_context(|| format!("Failed to process {}", args.file.display()))?;

    println!("Note saved to: {}", output.display());
    Ok(())
}
