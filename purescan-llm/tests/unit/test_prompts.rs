//! Unit tests for the product analysis prompt and output schema

use purescan_core::domain::{EncodedImage, HealthRating, ProductCategory};
use purescan_llm::domain::ContentBlock;
use purescan_llm::infrastructure::prompts::{
    PRODUCT_ANALYSIS_PROMPT, PromptBuilder, analysis_response_schema,
};

#[test]
fn test_product_analysis_prompt_covers_assessment() {
    assert!(PRODUCT_ANALYSIS_PROMPT.contains("health score (0-100)"));
    assert!(PRODUCT_ANALYSIS_PROMPT.contains("ingredients"));
    assert!(PRODUCT_ANALYSIS_PROMPT.contains("pros and cons"));
}

#[test]
fn test_schema_lists_every_category_and_rating() {
    let schema = analysis_response_schema();

    let categories: Vec<&str> = schema["properties"]["category"]["enum"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        ProductCategory::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>()
    );

    let ratings = schema["properties"]["rating"]["enum"].as_array().unwrap();
    assert_eq!(ratings.len(), HealthRating::ALL.len());
    assert!(ratings.iter().any(|r| r == "Toxic/Avoid"));
}

#[test]
fn test_schema_required_fields() {
    let schema = analysis_response_schema();
    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();

    for field in ["productName", "category", "healthScore", "summary", "pros", "cons", "rating"] {
        assert!(required.contains(&field), "{field} should be required");
    }
    assert!(!required.contains(&"ingredients"));
    assert!(!required.contains(&"detectedText"));
    assert_eq!(schema["properties"]["healthScore"]["type"], "INTEGER");
}

#[test]
fn test_prompt_builder_message() {
    let image = EncodedImage::new("image/webp", vec![1, 2, 3]);
    let message = PromptBuilder::build_product_analysis_message(&image);

    assert_eq!(message.content.len(), 2);
    assert_eq!(
        message.content[0],
        ContentBlock::inline_image("image/webp", "AQID")
    );
    assert_eq!(message.content[1], ContentBlock::text(PRODUCT_ANALYSIS_PROMPT));
}
