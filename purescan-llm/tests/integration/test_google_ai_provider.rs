//! Integration tests for GoogleAIProvider using wiremock

use std::sync::Arc;
use std::time::Duration;

use purescan_core::domain::{AnalysisError, ProductAnalyzer};
use purescan_llm::AnalyzeProductUseCase;
use purescan_llm::domain::{CompletionRequest, ContentBlock, LlmError, LlmProvider, Message};
use purescan_llm::infrastructure::providers::GoogleAIProvider;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
mod common {
    include!("../common/mod.rs");
}

use common::{create_test_config, sample_analysis_json, test_image};

fn create_provider(mock_server: &MockServer) -> GoogleAIProvider {
    GoogleAIProvider::new("test-api-key", "test-model")
        .with_base_url(mock_server.uri())
        .with_timeout(10)
}

fn create_test_request() -> CompletionRequest {
    CompletionRequest::new()
        .with_model("test-model")
        .with_message(Message::new(vec![ContentBlock::text("Hello, world!")]))
        .with_temperature(0.7)
}

fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 8,
            "totalTokenCount": 18
        }
    })
}

#[tokio::test]
async fn test_google_ai_provider_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(query_param("key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Hello!")))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let response = provider.complete(create_test_request()).await.unwrap();

    assert_eq!(response.model, "test-model");
    assert_eq!(response.text(), "Hello!");
    assert_eq!(response.usage.total_tokens, 18);
    assert!(!response.is_truncated());
}

#[tokio::test]
async fn test_google_ai_provider_invalid_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })),
        )
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let error = provider.complete(create_test_request()).await.unwrap_err();

    assert!(
        matches!(error, LlmError::Authentication(ref m) if m == "API key not valid. Please pass a valid API key.")
    );
}

#[tokio::test]
async fn test_google_ai_provider_api_error_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "12")
                .set_body_json(serde_json::json!({
                    "error": { "message": "Resource has been exhausted", "code": 429 }
                })),
        )
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let error = provider.complete(create_test_request()).await.unwrap_err();

    assert!(error.to_string().contains("Rate limited"));
    assert_eq!(error.retry_after(), Some(Duration::from_secs(12)));
}

#[tokio::test]
async fn test_google_ai_provider_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Internal server error"
            })),
        )
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let error = provider.complete(create_test_request()).await.unwrap_err();

    assert!(error.to_string().contains("Service unavailable"));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_google_ai_provider_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let error = provider.complete(create_test_request()).await.unwrap_err();

    assert!(matches!(error, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_google_ai_provider_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_body("late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server).with_timeout(1);
    let error = provider.complete(create_test_request()).await.unwrap_err();

    assert!(matches!(error, LlmError::Timeout { seconds: 1 }));
}

#[tokio::test]
async fn test_analyze_product_against_gemini_contract() {
    let mock_server = MockServer::start().await;
    let image = test_image();

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "inlineData": { "mimeType": "image/png", "data": image.to_base64() } }]
            }],
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body(&sample_analysis_json(42))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.google_ai.base_url = mock_server.uri();
    let provider = Arc::new(create_provider(&mock_server));
    let use_case = AnalyzeProductUseCase::new(provider, &config);

    let result = use_case.analyze(&image).await.unwrap();
    assert_eq!(result.product_name, "Sparkling Orange Soda");
    assert_eq!(result.health_score.value(), 42);
}

#[tokio::test]
async fn test_analyze_product_empty_candidate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "STOP" }]
        })))
        .mount(&mock_server)
        .await;

    let provider = Arc::new(create_provider(&mock_server));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert_eq!(err, AnalysisError::EmptyResponse);
}
