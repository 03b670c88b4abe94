pub mod error;
pub mod messages;
pub mod provider;

pub use error::LlmError;
pub use messages::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, StopReason, Usage,
};
pub use provider::{LlmProvider, ProviderCapabilities, ProviderInfo};
