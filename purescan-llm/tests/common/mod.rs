// Common test utilities and mock implementations

use async_trait::async_trait;
use purescan_core::config::LlmConfig;
use purescan_core::domain::EncodedImage;
use purescan_llm::domain::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider,
    ProviderCapabilities, ProviderInfo, StopReason, Usage,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock LLM provider for testing
pub struct MockLlmProvider {
    /// Response to return from complete()
    pub response: Option<CompletionResponse>,
    /// Error to return (if any)
    pub error: Option<LlmError>,
    /// Advertised capabilities
    pub capabilities: ProviderCapabilities,
    /// Captured requests for verification
    pub captured_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            response: None,
            error: None,
            capabilities: ProviderCapabilities::multimodal(),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, response: CompletionResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_error(mut self, error: LlmError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn without_vision(mut self) -> Self {
        self.capabilities.vision = false;
        self
    }

    pub fn without_json_mode(mut self) -> Self {
        self.capabilities.json_mode = false;
        self
    }

    pub fn with_json_response(content: &str) -> Self {
        Self::new().with_response(create_completion_response(content))
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: "mock",
            name: "Mock Provider",
            capabilities: self.capabilities,
        }
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.captured_requests.lock().await.push(request);

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.response
            .clone()
            .ok_or_else(|| LlmError::Other("No response configured".to_string()))
    }
}

/// Create a standard LLM response with given content
pub fn create_completion_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        id: "test-response-id".to_string(),
        model: "test-model".to_string(),
        content: vec![ContentBlock::text(content)],
        stop_reason: StopReason::EndTurn,
        usage: Usage {
            prompt_tokens: 100,
            completion_tokens: 50,
            total_tokens: 150,
        },
        created: Some(1234567890),
    }
}

/// A well-formed analysis payload
pub fn sample_analysis_json(score: i64) -> String {
    serde_json::json!({
        "productName": "Sparkling Orange Soda",
        "category": "Food",
        "healthScore": score,
        "summary": "High in added sugar. Contains artificial colouring.",
        "pros": ["Caffeine free"],
        "cons": ["39g sugar per can", "Sunset Yellow (E110)"],
        "ingredients": ["Carbonated water", "Sugar", "E110"],
        "rating": "Bad"
    })
    .to_string()
}

/// Small PNG-tagged test image
pub fn test_image() -> EncodedImage {
    EncodedImage::new("image/png", vec![0x89, b'P', b'N', b'G', 1, 2, 3])
}

/// Create default test LlmConfig
pub fn create_test_config() -> LlmConfig {
    let mut config = LlmConfig::default();
    config.google_ai.api_key = Some("test-api-key".to_string());
    config.google_ai.base_url = "https://test.api.example.com".to_string();
    config.default_model = "test-model".to_string();
    config.timeout_seconds = 30;
    config
}
