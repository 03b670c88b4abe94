//! Application wiring shared by the CLI commands

use std::sync::Arc;

use purescan_core::config::{CameraConfig, Config, LlmConfig};
use purescan_core::domain::{FacingMode, ProductAnalyzer};
use purescan_core::infrastructure::acquisition::{CameraCapture, SnapshotCamera};
use purescan_llm::{AnalyzeProductUseCase, LlmError, create_provider};

/// Build the analysis client for the configured provider.
///
/// Fails with a credential error when no API key can be resolved.
pub fn build_analyzer(config: &LlmConfig) -> Result<Arc<dyn ProductAnalyzer>, LlmError> {
    let provider = create_provider(config)?;
    Ok(Arc::new(AnalyzeProductUseCase::new(provider, config)))
}

/// Build the capture component over the snapshot camera
pub fn build_camera(
    config: &Config,
    camera: &CameraConfig,
    facing: Option<FacingMode>,
) -> CameraCapture<SnapshotCamera> {
    CameraCapture::new(
        SnapshotCamera::from_config(camera),
        facing.unwrap_or(config.capture.default_facing),
        config.capture.jpeg_quality,
    )
}
