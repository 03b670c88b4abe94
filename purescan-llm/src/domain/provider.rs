//! LLM Provider trait and related types

use async_trait::async_trait;

use crate::domain::error::LlmError;
use crate::domain::messages::{CompletionRequest, CompletionResponse};

/// Provider capability flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Supports image input
    pub vision: bool,
    /// Supports schema-constrained JSON output
    pub json_mode: bool,
}

impl ProviderCapabilities {
    /// Capabilities of a text-only model
    pub fn text_only() -> Self {
        Self {
            vision: false,
            json_mode: false,
        }
    }

    /// Capabilities of a model that accepts images and emits structured JSON
    pub fn multimodal() -> Self {
        Self {
            vision: true,
            json_mode: true,
        }
    }
}

/// Metadata about a provider
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Provider identifier (e.g., "google_ai")
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    pub capabilities: ProviderCapabilities,
}

/// Core trait for LLM providers
///
/// Object-safe, used as `Arc<dyn LlmProvider>`.
///
/// ```rust,ignore
/// use purescan_llm::{CompletionRequest, ContentBlock, LlmProvider, Message};
///
/// async fn ask(provider: &dyn LlmProvider) -> Result<String, LlmError> {
///     let request = CompletionRequest::new()
///         .with_message(Message::new(vec![ContentBlock::text("Is oat milk healthy?")]));
///     Ok(provider.complete(request).await?.text())
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider metadata
    fn info(&self) -> ProviderInfo;

    /// Generate a completion. One attempt, no retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;
}
