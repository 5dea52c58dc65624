use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::discovery::DiscoveryConfig;
use crate::notes::GeminiConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::worker::WorkerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub discovery: DiscoveryConfig,
    pub orchestrator: OrchestratorConfig,
    pub worker: SanitizedWorkerConfig,
    pub gemini: SanitizedGeminiConfig,
}

/// Worker config with environment values hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedWorkerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<PathBuf>,
    pub args: Vec<String>,
    pub env_keys: Vec<String>,
    pub inherit_env: bool,
}

/// Gemini config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGeminiConfig {
    pub model: String,
    pub api_base: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub mime_type: String,
    pub output_extension: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            discovery: config.discovery.clone(),
            orchestrator: config.orchestrator.clone(),
            worker: SanitizedWorkerConfig {
                program: config.worker.program.clone(),
                args: config.worker.args.clone(),
                env_keys: config.worker.envs.keys().cloned().collect(),
                inherit_env: config.worker.inherit_env,
            },
            gemini: SanitizedGeminiConfig {
                model: config.gemini.model.clone(),
                api_base: config.gemini.api_base.clone(),
                api_key_configured: config
                    .gemini
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                timeout_secs: config.gemini.timeout_secs,
                mime_type: config.gemini.mime_type.clone(),
                output_extension: config.gemini.output_extension.clone(),
            },
        }
    }
}
