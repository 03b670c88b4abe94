use purescan_core::domain::{EncodedImage, HealthRating, ProductCategory};
use serde_json::{Value, json};

use crate::domain::{ContentBlock, Message};

pub const PRODUCT_ANALYSIS_PROMPT: &str = r#"Analyze this image. It is likely a food item, a beauty/skincare product, or a medicine.
Identify the product. Read any visible text or ingredients list.
Assess its healthiness, safety, and effectiveness.
Provide a health score (0-100).
Categorize it accurately.
List pros and cons based on scientific knowledge of the ingredients.
If it's toxic or has harmful additives, mark it as TOXIC or BAD.
If it's organic, clean, or highly effective, mark it as GOOD or EXCELLENT."#;

/// Structured output contract for [`PRODUCT_ANALYSIS_PROMPT`].
///
/// Field names and enum values match the serde form of
/// [`AnalysisResult`](purescan_core::domain::AnalysisResult).
pub fn analysis_response_schema() -> Value {
    let categories: Vec<&str> = ProductCategory::ALL.iter().map(|c| c.as_str()).collect();
    let ratings: Vec<&str> = HealthRating::ALL.iter().map(|r| r.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "productName": { "type": "STRING" },
            "category": { "type": "STRING", "enum": categories },
            "healthScore": {
                "type": "INTEGER",
                "description": "A score from 0 to 100 where 100 is perfectly healthy/safe."
            },
            "summary": {
                "type": "STRING",
                "description": "A concise 2-3 sentence summary of the health impacts."
            },
            "pros": { "type": "ARRAY", "items": { "type": "STRING" } },
            "cons": { "type": "ARRAY", "items": { "type": "STRING" } },
            "ingredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of key ingredients detected or inferred."
            },
            "rating": { "type": "STRING", "enum": ratings },
            "detectedText": {
                "type": "STRING",
                "description": "Visible label text read from the image, if any."
            }
        },
        "required": ["productName", "category", "healthScore", "summary", "pros", "cons", "rating"]
    })
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// One user turn: the image part followed by the fixed instruction
    pub fn build_product_analysis_message(image: &EncodedImage) -> Message {
        Message::new(vec![
            ContentBlock::inline_image(image.mime_type(), image.to_base64()),
            ContentBlock::text(PRODUCT_ANALYSIS_PROMPT),
        ])
    }
}
