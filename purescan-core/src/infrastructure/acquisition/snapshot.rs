//! Camera device backed by still-frame files

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::DynamicImage;
use tracing::debug;

use crate::config::CameraConfig;
use crate::domain::{AcquisitionError, FacingMode};
use crate::infrastructure::acquisition::camera::{CameraDevice, VideoStream};

/// Serves frames from image files that an external capture tool keeps refreshed,
/// one file per facing direction.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCamera {
    environment_frame: Option<PathBuf>,
    user_frame: Option<PathBuf>,
}

impl SnapshotCamera {
    pub fn new(environment_frame: Option<PathBuf>, user_frame: Option<PathBuf>) -> Self {
        Self {
            environment_frame,
            user_frame,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.environment_frame.clone(), config.user_frame.clone())
    }

    fn frame_path(&self, facing: FacingMode) -> Option<&Path> {
        match facing {
            FacingMode::Environment => self.environment_frame.as_deref(),
            FacingMode::User => self.user_frame.as_deref(),
        }
    }
}

fn classify_io(facing: FacingMode, path: &Path, err: std::io::Error) -> AcquisitionError {
    match err.kind() {
        ErrorKind::NotFound => AcquisitionError::NoDevice(facing),
        ErrorKind::PermissionDenied => AcquisitionError::PermissionDenied,
        ErrorKind::WouldBlock | ErrorKind::ResourceBusy => {
            AcquisitionError::DeviceBusy(path.display().to_string())
        }
        _ => AcquisitionError::FileRead {
            path: path.display().to_string(),
            reason: err.to_string(),
        },
    }
}

fn decode_frame(path: &Path, bytes: &[u8]) -> Result<DynamicImage, AcquisitionError> {
    image::load_from_memory(bytes).map_err(|e| AcquisitionError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl CameraDevice for SnapshotCamera {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, AcquisitionError> {
        let path = self
            .frame_path(facing)
            .ok_or(AcquisitionError::NoDevice(facing))?
            .to_path_buf();

        // Probe once so an unreadable feed fails at open time, like a denied device.
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| classify_io(facing, &path, e))?;
        decode_frame(&path, &bytes)?;

        debug!(facing = %facing, path = %path.display(), "Opened snapshot stream");
        Ok(Box::new(SnapshotStream {
            facing,
            path,
            live: true,
        }))
    }
}

struct SnapshotStream {
    facing: FacingMode,
    path: PathBuf,
    live: bool,
}

impl VideoStream for SnapshotStream {
    fn facing(&self) -> FacingMode {
        self.facing
    }

    fn current_frame(&mut self) -> Result<DynamicImage, AcquisitionError> {
        if !self.live {
            return Err(AcquisitionError::StreamInactive);
        }
        let bytes =
            std::fs::read(&self.path).map_err(|e| classify_io(self.facing, &self.path, e))?;
        decode_frame(&self.path, &bytes)
    }

    fn stop(&mut self) {
        self.live = false;
    }
}
