//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::config::GeminiConfig;
use super::error::NotesError;
use super::traits::ContentGenerator;
use super::types::GenerateContentRequest;

/// Gemini API client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    /// Builds a client from configuration, resolving the API key.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, NotesError> {
        let api_key = config.resolve_api_key().ok_or(NotesError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotesError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, NotesError> {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(NotesError::EmptyResponse {
            finish_reason: block_reason,
        });
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(NotesError::EmptyResponse {
            finish_reason: candidate.finish_reason.or(block_reason),
        });
    }
    Ok(text)
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, NotesError> {
        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| NotesError::Http(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(NotesError::Api { status, message });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| NotesError::Json(e.to_string()))?;

        extract_text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new("key", "gemini-2.5-pro").with_api_base("http://localhost:8080");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_from_config_trims_base() {
        let config = GeminiConfig::default()
            .with_api_key("key")
            .with_api_base("http://localhost:8080/");
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "gemini-2.5-pro");
        assert!(client.endpoint().starts_with("http://localhost:8080/v1beta/"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "词根 spect\n"}, {"text": "inspect 检查"}]},
                    "finishReason": "STOP"
                }]
            }"#,
        );
        assert_eq!(extract_text(response).unwrap(), "词根 spect\ninspect 检查");
    }

    #[test]
    fn test_extract_text_empty_candidate() {
        let response = parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#);
        match extract_text(response) {
            Err(NotesError::EmptyResponse { finish_reason }) => {
                assert_eq!(finish_reason.as_deref(), Some("SAFETY"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response = parse(r#"{"promptFeedback": {"blockReason": "OTHER"}}"#);
        match extract_text(response) {
            Err(NotesError::EmptyResponse { finish_reason }) => {
                assert_eq!(finish_reason.as_deref(), Some("OTHER"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
