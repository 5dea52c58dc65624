use super::{types::Config, ConfigError};
use crate::discovery::GlobPattern;

/// Validate configuration
/// Currently validates:
/// - Discovery pattern is non-empty and compiles
/// - Worker program, when set, is non-empty
/// - Output extension is non-empty and has no leading dot
/// - Gemini model is non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.discovery.pattern.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "discovery.pattern cannot be empty".to_string(),
        ));
    }

    GlobPattern::new(&config.discovery.pattern).map_err(|e| {
        ConfigError::ValidationError(format!("discovery.pattern is invalid: {}", e))
    })?;

    if let Some(program) = &config.worker.program {
        if program.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "worker.program cannot be empty".to_string(),
            ));
        }
    }

    let extension = &config.gemini.output_extension;
    if extension.is_empty() {
        return Err(ConfigError::ValidationError(
            "gemini.output_extension cannot be empty".to_string(),
        ));
    }
    if extension.starts_with('.') {
        return Err(ConfigError::ValidationError(format!(
            "gemini.output_extension must not start with a dot: {}",
            extension
        )));
    }

    if config.gemini.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "gemini.model cannot be empty".to_string(),
        ));
    }

    Ok(())
}
