//! PureScan LLM - multimodal provider layer and product analysis client
//!
//! The [`AnalyzeProductUseCase`] implements
//! [`ProductAnalyzer`](purescan_core::domain::ProductAnalyzer) on top of any [`LlmProvider`].
//! Providers are built from [`LlmConfig`](purescan_core::config::LlmConfig) with
//! [`create_provider`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::AnalyzeProductUseCase;
pub use domain::*;
pub use infrastructure::prompts;
pub use infrastructure::providers::GoogleAIProvider;
pub use infrastructure::registry::create_provider;
