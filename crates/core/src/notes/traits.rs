//! Trait definitions for note generation.

use async_trait::async_trait;

use super::error::NotesError;
use super::types::GenerateContentRequest;

/// A remote service turning a request into generated text.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Model name, for logging.
    fn model(&self) -> &str;

    /// Performs one generation call. No retries.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, NotesError>;
}
