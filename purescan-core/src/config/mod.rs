//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::FacingMode;

/// Environment variables consulted for the Gemini credential, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub capture: CaptureConfig,
    pub camera: CameraConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Active provider. Only "google_ai" is supported.
    pub provider: String,

    /// Google AI (Gemini) configuration
    #[serde(default)]
    pub google_ai: GoogleAIConfig,

    /// Model used for product analysis
    pub default_model: String,
    /// Sampling temperature. Left to the provider default when unset.
    pub temperature: Option<f64>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "google_ai".to_string(),
            google_ai: GoogleAIConfig::default(),
            default_model: "gemini-3-pro-preview".to_string(),
            temperature: None,
            timeout_seconds: 120,
        }
    }
}

impl LlmConfig {
    /// Resolve the Gemini API key from config, then from the process environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.google_ai
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|key| !key.trim().is_empty())
            })
    }
}

/// Google AI (Gemini) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleAIConfig {
    /// API Key (can also use GEMINI_API_KEY or API_KEY env vars)
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
}

impl Default for GoogleAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// Frame capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// JPEG quality for captured camera frames (1-100)
    pub jpeg_quality: u8,
    /// Camera facing direction used when a capture starts
    pub default_facing: FacingMode,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            default_facing: FacingMode::Environment,
        }
    }
}

/// Snapshot camera configuration
///
/// Each facing direction is backed by an image file that an external capture
/// tool keeps refreshed. A direction without a frame behaves as a missing device.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CameraConfig {
    pub environment_frame: Option<PathBuf>,
    pub user_frame: Option<PathBuf>,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.llm.validate()?;
        self.capture.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_with(None)
    }

    /// Load configuration, layering an explicit file above the standard ones
    pub fn load_with(explicit: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder.add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Environment variables last (highest priority)
        builder = builder.add_source(
            config::Environment::with_prefix("PURESCAN")
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
