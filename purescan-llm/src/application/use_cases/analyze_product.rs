use std::sync::Arc;

use async_trait::async_trait;
use purescan_core::config::LlmConfig;
use purescan_core::domain::{AnalysisError, AnalysisResult, EncodedImage, ProductAnalyzer};
use tracing::{debug, info, warn};

use crate::domain::{CompletionRequest, LlmError, LlmProvider};
use crate::infrastructure::prompts::{PromptBuilder, analysis_response_schema};
use crate::infrastructure::response_parser::ResponseParser;

/// Sends one product image to the provider under the structured output contract
pub struct AnalyzeProductUseCase {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f64>,
}

impl AnalyzeProductUseCase {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            model: config.default_model.clone(),
            temperature: config.temperature,
        }
    }

    fn build_request(&self, image: &EncodedImage) -> CompletionRequest {
        let mut request = CompletionRequest::new()
            .with_model(&self.model)
            .with_message(PromptBuilder::build_product_analysis_message(image))
            .with_json_schema(analysis_response_schema());
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }

    pub async fn execute(&self, image: &EncodedImage) -> Result<AnalysisResult, LlmError> {
        let info = self.provider.info();
        if !info.capabilities.vision {
            return Err(LlmError::InvalidRequest(format!(
                "Provider {} does not accept image input",
                info.name
            )));
        }
        if !info.capabilities.json_mode {
            return Err(LlmError::InvalidRequest(format!(
                "Provider {} cannot enforce a JSON response schema",
                info.name
            )));
        }

        debug!(
            provider = info.id,
            model = %self.model,
            mime_type = image.mime_type(),
            bytes = image.len(),
            "Requesting product analysis"
        );

        let response = self.provider.complete(self.build_request(image)).await?;
        if response.is_truncated() {
            warn!(model = %response.model, "Analysis response hit the output token limit");
        }

        let result: AnalysisResult = ResponseParser::parse_json(&response.text())?;
        info!(
            product = %result.product_name,
            category = %result.category,
            score = result.health_score.value(),
            "Product analysis parsed"
        );
        Ok(result)
    }
}

#[async_trait]
impl ProductAnalyzer for AnalyzeProductUseCase {
    async fn analyze(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError> {
        self.execute(image).await.map_err(|err| {
            warn!(error = %err, retryable = err.is_retryable(), "Product analysis failed");
            AnalysisError::from(err)
        })
    }
}
