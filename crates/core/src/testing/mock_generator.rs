//! Mock content generator for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::notes::{ContentGenerator, GenerateContentRequest, NotesError};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Api { status: u16, message: String },
    Empty,
}

/// Mock generator returning a canned reply and recording every request.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    reply: Reply,
    requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
}

impl MockGenerator {
    /// Always answers with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Always fails with an API error.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Api {
            status,
            message: message.into(),
        })
    }

    /// Always answers with no text.
    pub fn empty() -> Self {
        Self::with_reply(Reply::Empty)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, NotesError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Api { status, message } => Err(NotesError::Api {
                status: *status,
                message: message.clone(),
            }),
            Reply::Empty => Err(NotesError::EmptyResponse {
                finish_reason: Some("STOP".to_string()),
            }),
        }
    }
}
