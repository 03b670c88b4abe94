//! Unit tests for AnalyzeProductUseCase

use purescan_core::domain::{
    AnalysisError, GENERIC_ANALYSIS_FAILURE, HealthRating, ProductAnalyzer, ProductCategory,
};
use purescan_llm::application::use_cases::AnalyzeProductUseCase;
use purescan_llm::domain::{ContentBlock, LlmError};
use purescan_llm::infrastructure::prompts::PRODUCT_ANALYSIS_PROMPT;
use rstest::rstest;
use std::sync::Arc;

#[allow(dead_code)]
mod common {
    include!("../common/mod.rs");
}

use common::{MockLlmProvider, create_test_config, sample_analysis_json, test_image};

#[tokio::test]
async fn test_analyze_product_success() {
    let provider = Arc::new(MockLlmProvider::with_json_response(&sample_analysis_json(
        35,
    )));
    let use_case = AnalyzeProductUseCase::new(provider.clone(), &create_test_config());

    let result = use_case.analyze(&test_image()).await.unwrap();

    assert_eq!(result.product_name, "Sparkling Orange Soda");
    assert_eq!(result.category, ProductCategory::Food);
    assert_eq!(result.health_score.value(), 35);
    assert_eq!(result.rating, HealthRating::Bad);
    assert_eq!(result.ingredients.len(), 3);
    assert!(result.detected_text.is_none());
}

#[tokio::test]
async fn test_analyze_product_sends_image_then_prompt_with_schema() {
    let provider = Arc::new(MockLlmProvider::with_json_response(&sample_analysis_json(
        35,
    )));
    let mut config = create_test_config();
    config.temperature = Some(0.2);
    let use_case = AnalyzeProductUseCase::new(provider.clone(), &config);

    use_case.analyze(&test_image()).await.unwrap();

    let requests = provider.captured_requests.lock().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model.as_deref(), Some("test-model"));
    assert_eq!(request.temperature, Some(0.2));
    assert_eq!(
        request.response_mime_type.as_deref(),
        Some("application/json")
    );
    assert!(request.response_schema.is_some());

    assert_eq!(request.messages.len(), 1);
    let message = &request.messages[0];
    assert_eq!(message.content.len(), 2);
    match &message.content[0] {
        ContentBlock::InlineImage { mime_type, data } => {
            assert_eq!(mime_type, "image/png");
            assert_eq!(data, &test_image().to_base64());
        }
        other => panic!("expected inline image first, got {other:?}"),
    }
    assert_eq!(message.content[1].as_text(), Some(PRODUCT_ANALYSIS_PROMPT));
}

#[tokio::test]
async fn test_analyze_product_accepts_fenced_json() {
    let content = format!("```json\n{}\n```", sample_analysis_json(80));
    let provider = Arc::new(MockLlmProvider::with_json_response(&content));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let result = use_case.analyze(&test_image()).await.unwrap();
    assert_eq!(result.health_score.value(), 80);
}

#[tokio::test]
async fn test_analyze_product_empty_response() {
    let provider = Arc::new(MockLlmProvider::with_json_response("   "));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert_eq!(err, AnalysisError::EmptyResponse);
    assert_eq!(err.user_message(), GENERIC_ANALYSIS_FAILURE);
}

#[rstest]
#[case::score_above_range(r#""healthScore": 101"#)]
#[case::negative_score(r#""healthScore": -1"#)]
#[case::fractional_score(r#""healthScore": 55.5"#)]
#[case::unknown_category(r#""category": "Toy""#)]
#[case::unknown_rating(r#""rating": "Great""#)]
#[tokio::test]
async fn test_analyze_product_schema_violations(#[case] replacement: &str) {
    let mut value: serde_json::Value = serde_json::from_str(&sample_analysis_json(50)).unwrap();
    let patch: serde_json::Value = serde_json::from_str(&format!("{{{replacement}}}")).unwrap();
    for (key, field) in patch.as_object().unwrap() {
        value[key] = field.clone();
    }

    let provider = Arc::new(MockLlmProvider::with_json_response(&value.to_string()));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::SchemaViolation(_)), "{err:?}");
    assert_eq!(err.user_message(), GENERIC_ANALYSIS_FAILURE);
}

#[tokio::test]
async fn test_analyze_product_missing_required_field() {
    let mut value: serde_json::Value = serde_json::from_str(&sample_analysis_json(50)).unwrap();
    value.as_object_mut().unwrap().remove("summary");

    let provider = Arc::new(MockLlmProvider::with_json_response(&value.to_string()));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::SchemaViolation(ref m) if m.contains("summary")));
}

#[tokio::test]
async fn test_analyze_product_credential_error_is_verbatim() {
    let error = LlmError::auth("API key not valid. Please pass a valid API key.");
    let provider = Arc::new(MockLlmProvider::new().with_error(error));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "API key not valid. Please pass a valid API key."
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_analyze_product_network_error_is_generic() {
    let provider =
        Arc::new(MockLlmProvider::new().with_error(LlmError::network("connection reset")));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
    assert_eq!(err.user_message(), GENERIC_ANALYSIS_FAILURE);
}

#[tokio::test]
async fn test_analyze_product_requires_vision_provider() {
    let provider = Arc::new(
        MockLlmProvider::with_json_response(&sample_analysis_json(50)).without_vision(),
    );
    let use_case = AnalyzeProductUseCase::new(provider.clone(), &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
    assert!(provider.captured_requests.lock().await.is_empty());
}

#[tokio::test]
async fn test_analyze_product_requires_json_mode() {
    let provider = Arc::new(
        MockLlmProvider::with_json_response(&sample_analysis_json(50)).without_json_mode(),
    );
    let use_case = AnalyzeProductUseCase::new(provider.clone(), &create_test_config());

    let err = use_case.execute(&test_image()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidRequest(ref m) if m.contains("JSON")));
    assert!(provider.captured_requests.lock().await.is_empty());
}

#[tokio::test]
async fn test_analyze_product_rejects_positional_array() {
    let content = r#"["Sparkling Orange Soda","Food",35,"Sugary.",[],[],[],"Bad"]"#;
    let provider = Arc::new(MockLlmProvider::with_json_response(content));
    let use_case = AnalyzeProductUseCase::new(provider, &create_test_config());

    let err = use_case.analyze(&test_image()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::SchemaViolation(ref m) if m.contains("JSON object")));
}
