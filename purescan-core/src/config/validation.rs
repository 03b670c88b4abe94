//! Configuration validation module

use crate::config::{CaptureConfig, LlmConfig, LoggingConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Logging configuration error: {message}")]
    Logging { message: String },

    #[error("LLM configuration error: {message}")]
    Llm { message: String },

    #[error("Capture configuration error: {message}")]
    Capture { message: String },
}

impl ValidationError {
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture {
            message: message.into(),
        }
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !matches!(self.format.as_str(), "json" | "pretty") {
            return Err(ValidationError::logging(format!(
                "format must be \"json\" or \"pretty\", got \"{}\"",
                self.format
            )));
        }
        if self.level.trim().is_empty() {
            return Err(ValidationError::logging("level must not be empty"));
        }
        Ok(())
    }
}

impl Validate for LlmConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !matches!(self.provider.as_str(), "google_ai" | "gemini" | "google") {
            return Err(ValidationError::llm(format!(
                "unsupported provider \"{}\"",
                self.provider
            )));
        }
        if self.default_model.trim().is_empty() {
            return Err(ValidationError::llm("default_model must not be empty"));
        }
        if self.timeout_seconds == 0 {
            return Err(ValidationError::llm("timeout_seconds must be > 0"));
        }
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ValidationError::llm("temperature must be within 0.0..=2.0"));
        }
        if self.google_ai.base_url.trim().is_empty() {
            return Err(ValidationError::llm("google_ai.base_url must not be empty"));
        }
        Ok(())
    }
}

impl Validate for CaptureConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ValidationError::capture(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
