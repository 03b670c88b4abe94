//! Provider construction from configuration

use std::sync::Arc;

use purescan_core::config::{API_KEY_ENV_VARS, LlmConfig};
use tracing::debug;

use crate::domain::{LlmError, LlmProvider};
use crate::infrastructure::providers::GoogleAIProvider;

/// Provider type identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderType {
    GoogleAI,
    Custom(String),
}

impl ProviderType {
    /// Parse from string
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "google_ai" | "gemini" | "google" => Self::GoogleAI,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::GoogleAI => "google_ai",
            Self::Custom(s) => s,
        }
    }
}

/// Build the configured provider.
///
/// A missing API key is reported as [`LlmError::Configuration`] so it surfaces to the user
/// as a credential problem before any image is sent.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match ProviderType::parse(&config.provider) {
        ProviderType::GoogleAI => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                LlmError::Configuration(format!(
                    "API Key not configured. Set llm.google_ai.api_key or the {} environment variable.",
                    API_KEY_ENV_VARS.join(" / ")
                ))
            })?;

            let mut provider = GoogleAIProvider::new(api_key, &config.default_model)
                .with_timeout(config.timeout_seconds);
            if !config.google_ai.base_url.is_empty() {
                provider = provider.with_base_url(&config.google_ai.base_url);
            }

            debug!(
                provider = ProviderType::GoogleAI.as_str(),
                model = %config.default_model,
                "LLM provider created"
            );
            Ok(Arc::new(provider))
        }
        ProviderType::Custom(name) => Err(LlmError::ProviderNotFound(format!(
            "Unknown provider: {}. Valid options: google_ai",
            name
        ))),
    }
}
