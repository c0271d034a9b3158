//! Fake text generator for tests.
//!
//! Replays one canned reply and records every request it receives, so tests
//! can assert on prompts, schemas and temperatures without network access.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{GenerationRequest, LlmError, TextGenerator};

/// Owned copy of a request seen by `FakeGenerator`.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub schema: Value,
    pub temperature: Option<f32>,
}

#[derive(Debug, Default)]
pub struct FakeGenerator {
    /// `None` simulates an upstream failure.
    reply: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            prompt: request.prompt.to_string(),
            schema: request.schema.clone(),
            temperature: request.temperature,
        });
        self.reply.clone().ok_or_else(|| LlmError::Api {
            status: 503,
            message: "The model is overloaded. Please try again later.".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_generator_records_and_replays() {
        let fake = FakeGenerator::replying("{}");
        let schema = serde_json::json!({"type": "OBJECT"});
        let reply = fake
            .generate(&GenerationRequest {
                prompt: "hello",
                schema: &schema,
                temperature: Some(0.5),
            })
            .await
            .unwrap();
        assert_eq!(reply, "{}");
        let seen = fake.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].prompt, "hello");
    }

    #[tokio::test]
    async fn test_failing_generator_returns_api_error() {
        let fake = FakeGenerator::failing();
        let schema = serde_json::json!({});
        let result = fake
            .generate(&GenerationRequest {
                prompt: "hello",
                schema: &schema,
                temperature: None,
            })
            .await;
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
    }
}
