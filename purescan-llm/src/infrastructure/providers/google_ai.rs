//! Google AI Studio (Gemini) provider implementation
//!
//! Translates provider-agnostic requests into `generateContent` calls, including inline
//! image parts and schema-constrained JSON output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::domain::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider,
    ProviderCapabilities, ProviderInfo, StopReason, Usage,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

const USER_ROLE: &str = "user";

/// Google AI Studio (Gemini) provider
pub struct GoogleAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GoogleAIProvider {
    /// Create a new Google AI provider
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create with custom base URL (for testing or proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Build the API URL for a model endpoint
    fn build_url(&self, model: &str, endpoint: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.base_url, model, endpoint, self.api_key
        )
    }

    /// Convert our request format to Gemini's format
    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: USER_ROLE,
                parts: msg.content.iter().map(GeminiPart::from).collect(),
            })
            .collect();

        GeminiRequest {
            contents,
            generation_config: Some(GeminiGenerationConfig {
                temperature: request.temperature,
                response_mime_type: request.response_mime_type.clone(),
                response_schema: request.response_schema.clone(),
            }),
        }
    }

    /// Convert Gemini response to our format
    fn from_gemini_response(
        &self,
        response: GeminiResponse,
        model: &str,
    ) -> Result<CompletionResponse, LlmError> {
        let usage = response
            .usage_metadata
            .map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = response.candidates.into_iter().next() else {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(LlmError::ContentFiltered { reason });
            }
            warn!(model = model, "Google AI returned no candidates");
            return Ok(CompletionResponse {
                id: format!("gemini-{}", uuid::Uuid::new_v4()),
                model: model.to_string(),
                content: Vec::new(),
                stop_reason: StopReason::Other,
                usage,
                created: Some(chrono::Utc::now().timestamp() as u64),
            });
        };

        let content = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.map(|text| ContentBlock::Text { text }))
            .collect();

        let stop_reason = match candidate.finish_reason.as_deref() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST") => StopReason::ContentFilter,
            _ => StopReason::Other,
        };

        Ok(CompletionResponse {
            id: format!("gemini-{}", uuid::Uuid::new_v4()),
            model: model.to_string(),
            content,
            stop_reason,
            usage,
            created: Some(chrono::Utc::now().timestamp() as u64),
        })
    }

    /// Classify a non-success HTTP response
    fn classify_error(
        status: StatusCode,
        body: &str,
        retry_after: Option<u64>,
        model: &str,
    ) -> LlmError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status.as_u16() {
            // Rejected keys come back as 400 INVALID_ARGUMENT
            400 if mentions_api_key(&message) => LlmError::auth(message),
            400 => LlmError::InvalidRequest(message),
            401 | 403 => LlmError::auth(message),
            404 => LlmError::ModelNotFound(model.to_string()),
            429 => match retry_after {
                Some(seconds) => LlmError::rate_limited_with_retry(message, seconds),
                None => LlmError::rate_limited(message),
            },
            500..=599 => LlmError::ServiceUnavailable(message),
            _ => LlmError::Other(format!("API error {}: {}", status, message)),
        }
    }
}

fn mentions_api_key(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("api key") || lower.contains("api_key")
}

#[async_trait]
impl LlmProvider for GoogleAIProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: "google_ai",
            name: "Google AI Studio",
            capabilities: ProviderCapabilities::multimodal(),
        }
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let url = self.build_url(model, "generateContent");
        let gemini_request = self.to_gemini_request(&request);

        debug!(model = model, "Sending request to Google AI");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmError::timeout(self.timeout.as_secs())
                } else {
                    LlmError::from(err.without_url())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();

            let err = Self::classify_error(status, &text, retry_after, model);
            error!(status = %status, error = %err, "Google AI API error");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|err| LlmError::from(err.without_url()))?;
        let gemini_response: GeminiResponse = serde_json::from_str(&body)?;
        self.from_gemini_response(gemini_response, model)
    }
}

// === Gemini API Types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

impl From<&ContentBlock> for GeminiPart {
    fn from(block: &ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => GeminiPart::Text { text: text.clone() },
            ContentBlock::InlineImage { mime_type, data } => GeminiPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}
