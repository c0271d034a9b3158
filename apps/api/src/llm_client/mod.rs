//! LLM Client: the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Planner code talks to `dyn TextGenerator`; `GeminiClient` is the production
//! implementation.
//!
//! Model: gemini-2.5-flash (hardcoded, do not make configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{ShapeError, Validate};

#[cfg(test)]
pub mod fake;
pub mod prompts;
pub mod schema;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for every generation.
pub const MODEL: &str = "gemini-2.5-flash";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response does not match the expected shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One schema-constrained generation: prompt text plus the declared output shape.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub schema: &'a Value,
    pub temperature: Option<f32>,
}

/// A text-generation backend. Implementations are stateless: one call, one
/// round trip, no retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw response text for a single request.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(request: &GenerationRequest<'a>) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: request.schema,
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it produced any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Gemini `generateContent` endpoint with structured-output requests.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{MODEL}:generateContent", self.api_base)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError> {
        let body = GenerateContentRequest::new(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        if let Some(reason) = parsed.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            debug!("Gemini finish reason: {reason}");
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }

    fn model_name(&self) -> &str {
        MODEL
    }
}

/// Prefers the message from Gemini's `{"error": {"message": ...}}` envelope and
/// falls back to the raw body.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Calls the generator and deserializes the text response as `T`, then runs
/// shape validation. Nothing is returned unless every step succeeds.
pub async fn call_json<T>(
    generator: &dyn TextGenerator,
    request: &GenerationRequest<'_>,
) -> Result<T, LlmError>
where
    T: DeserializeOwned + Validate,
{
    let text = generator.generate(request).await?;
    parse_response(&text)
}

/// Fence stripping, JSON parsing and validation of one raw response.
pub fn parse_response<T>(text: &str) -> Result<T, LlmError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(strip_json_fences(text))?;
    value.validate()?;
    Ok(value)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plan::fixtures::two_day_plan;
    use crate::models::plan::{Dish, MealPlan};

    const DISH: &str = r#"{"name":"Avocado Toast","description":"Sourdough","calories":320,"protein":9,"carbs":30,"fat":18}"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = format!("```json\n{DISH}\n```");
        assert_eq!(strip_json_fences(&input), DISH);
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = format!("```\n{DISH}\n```");
        assert_eq!(strip_json_fences(&input), DISH);
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = format!("  {DISH}\n");
        assert_eq!(strip_json_fences(&input), DISH);
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = format!("```json\n[{DISH}]");
        assert_eq!(strip_json_fences(&input), format!("[{DISH}]"));
    }

    #[test]
    fn test_fenced_plan_parses_like_bare_plan() {
        let bare = serde_json::to_string(&two_day_plan()).unwrap();
        let fenced = format!("```json\n{bare}\n```");
        let a: MealPlan = parse_response(&bare).unwrap();
        let b: MealPlan = parse_response(&fenced).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, two_day_plan());
    }

    #[test]
    fn test_parse_response_rejects_non_json() {
        let result = parse_response::<MealPlan>("not json");
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_parse_response_runs_validation() {
        let json = r#"[{"name":"Toast","description":"d","calories":-1,"protein":1,"carbs":1,"fat":1}]"#;
        let result = parse_response::<Vec<Dish>>(json);
        assert!(matches!(result, Err(LlmError::Shape(_))));
    }

    #[test]
    fn test_request_body_declares_schema_and_temperature() {
        let schema = serde_json::json!({"type": "OBJECT"});
        let request = GenerationRequest {
            prompt: "make a plan",
            schema: &schema,
            temperature: Some(0.7),
        };
        let body = serde_json::to_value(GenerateContentRequest::new(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "make a plan");
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert!((config["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_omits_unset_temperature() {
        let schema = serde_json::json!({"type": "ARRAY"});
        let request = GenerationRequest {
            prompt: "search",
            schema: &schema,
            temperature: None,
        };
        let body = serde_json::to_value(GenerateContentRequest::new(&request)).unwrap();
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(
            response.usage_metadata.unwrap().prompt_token_count,
            Some(12)
        );
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_api_error_extracts_gemini_message() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        match api_error(429, body.to_string()) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(502, "upstream connect error".to_string()) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream connect error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_client_endpoint_and_debug_redacts_key() {
        let client = GeminiClient::new(
            "secret-key".to_string(),
            "http://localhost:9999/v1beta/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert_eq!(client.model_name(), MODEL);
    }
}
