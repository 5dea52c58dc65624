//! Configuration for note generation.

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Prompt sent alongside the audio: transcribe into vocabulary notes.
pub const DEFAULT_PROMPT: &str = "\
识别文字后转化为笔记，格式为：
词根（可能无）
单词1 单词1翻译
例句1
补充笔记1

单词2 单词2翻译
例句2
补充笔记2
";

/// Configuration for the Gemini client and the note writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key. Falls back to `GEMINI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// MIME type declared for the inline audio.
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Instruction text sent after the audio.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Extension of the written note, without the dot.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Inline uploads above this size (MB) are logged as likely to be rejected.
    #[serde(default = "default_size_warning")]
    pub size_warning_mb: f64,
}

fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    600 // 10 minutes
}

fn default_mime_type() -> String {
    "audio/mp3".to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_output_extension() -> String {
    "md".to_string()
}

fn default_size_warning() -> f64 {
    18.0
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
            mime_type: default_mime_type(),
            prompt: default_prompt(),
            output_extension: default_output_extension(),
            size_warning_mb: default_size_warning(),
        }
    }
}

impl GeminiConfig {
    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// The configured key, or the `GEMINI_API_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}
