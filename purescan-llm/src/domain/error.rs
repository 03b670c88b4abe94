//! LLM-specific error types
//!
//! Typed errors for provider calls, plus their classification into the
//! [`AnalysisError`] categories the scan session understands.

use std::fmt;

use purescan_core::domain::AnalysisError;

/// LLM operation error
#[derive(Debug, Clone)]
pub enum LlmError {
    /// Authentication failed (invalid or missing API key)
    Authentication(String),

    /// Rate limited by the provider
    RateLimited {
        /// Seconds to wait before retrying (if provided)
        retry_after: Option<u64>,
        /// Error message
        message: String,
    },

    /// Request was rejected as invalid
    InvalidRequest(String),

    /// Content was blocked by safety systems
    ContentFiltered {
        /// Reason for filtering
        reason: String,
    },

    /// Model not found or not available
    ModelNotFound(String),

    /// Network/connection error
    Network(String),

    /// Request timed out
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Service temporarily unavailable
    ServiceUnavailable(String),

    /// Provider returned an unexpected response
    InvalidResponse(String),

    /// Configuration error
    Configuration(String),

    /// Provider not supported
    ProviderNotFound(String),

    /// Generic/unknown error
    Other(String),
}

impl LlmError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. }
                | LlmError::Network(_)
                | LlmError::Timeout { .. }
                | LlmError::ServiceUnavailable(_)
        )
    }

    /// Get retry-after duration if available
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            LlmError::RateLimited { retry_after, .. } => {
                retry_after.map(std::time::Duration::from_secs)
            }
            _ => None,
        }
    }

    /// Create a rate limited error
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            retry_after: None,
            message: message.into(),
        }
    }

    /// Create a rate limited error with retry duration
    pub fn rate_limited_with_retry(message: impl Into<String>, seconds: u64) -> Self {
        Self::RateLimited {
            retry_after: Some(seconds),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            LlmError::RateLimited {
                message,
                retry_after,
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited: {} (retry after {}s)", message, secs)
                } else {
                    write!(f, "Rate limited: {}", message)
                }
            }
            LlmError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            LlmError::ContentFiltered { reason } => write!(f, "Content filtered: {}", reason),
            LlmError::ModelNotFound(model) => write!(f, "Model not found: {}", model),
            LlmError::Network(msg) => write!(f, "Network error: {}", msg),
            LlmError::Timeout { seconds } => write!(f, "Request timed out after {}s", seconds),
            LlmError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            LlmError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LlmError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            LlmError::ProviderNotFound(name) => write!(f, "Provider not found: {}", name),
            LlmError::Other(msg) => write!(f, "LLM error: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout { seconds: 0 }
        } else if err.is_connect() {
            LlmError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::InvalidResponse(format!("JSON parse error: {}", err))
    }
}

/// Credential problems keep their message, everything else is reduced to a category
impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Authentication(message) | LlmError::Configuration(message) => {
                AnalysisError::Credential(message)
            }
            LlmError::InvalidResponse(message) if message.trim().is_empty() => {
                AnalysisError::EmptyResponse
            }
            LlmError::InvalidResponse(message) => AnalysisError::SchemaViolation(message),
            other => AnalysisError::Transport(other.to_string()),
        }
    }
}
