//! Camera device abstraction and one-shot frame capture

use async_trait::async_trait;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, info, warn};

use crate::domain::{AcquisitionError, EncodedImage, FacingMode};

/// MIME type of captured frames
pub const CAPTURE_MIME_TYPE: &str = "image/jpeg";

/// A live video stream obtained from a camera device
pub trait VideoStream: Send {
    fn facing(&self) -> FacingMode;

    /// Rasterize the current frame
    fn current_frame(&mut self) -> Result<DynamicImage, AcquisitionError>;

    /// Stop every track of the stream. Must be idempotent.
    fn stop(&mut self);
}

/// A camera the platform can open a stream on
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request a stream for the given direction. May wait on a permission prompt.
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, AcquisitionError>;
}

/// Exclusive owner of an open stream. Tracks are stopped when the handle is dropped.
pub struct StreamHandle {
    stream: Box<dyn VideoStream>,
}

impl StreamHandle {
    pub fn new(stream: Box<dyn VideoStream>) -> Self {
        Self { stream }
    }

    pub fn facing(&self) -> FacingMode {
        self.stream.facing()
    }

    pub fn current_frame(&mut self) -> Result<DynamicImage, AcquisitionError> {
        self.stream.current_frame()
    }

    /// Stop the stream now
    pub fn release(self) {}
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        debug!(facing = %self.stream.facing(), "Stopping camera stream");
        self.stream.stop();
    }
}

/// Encode a frame as JPEG at the given quality (1-100)
pub fn encode_jpeg(frame: &DynamicImage, quality: u8) -> Result<EncodedImage, AcquisitionError> {
    let rgb = frame.to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AcquisitionError::Encode(e.to_string()))?;
    Ok(EncodedImage::new(CAPTURE_MIME_TYPE, bytes))
}

/// Live capture component.
///
/// Holds at most one stream at a time. Starting, switching direction, capturing and
/// cancelling all release the previous stream before anything else happens, and dropping
/// the component releases whatever is still open.
pub struct CameraCapture<D> {
    device: D,
    facing: FacingMode,
    jpeg_quality: u8,
    stream: Option<StreamHandle>,
}

impl<D: CameraDevice> CameraCapture<D> {
    pub fn new(device: D, facing: FacingMode, jpeg_quality: u8) -> Self {
        Self {
            device,
            facing,
            jpeg_quality,
            stream: None,
        }
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Open a stream for the current direction
    pub async fn start(&mut self) -> Result<(), AcquisitionError> {
        self.release_stream();

        info!(facing = %self.facing, "Requesting camera stream");
        match self.device.open(self.facing).await {
            Ok(stream) => {
                self.stream = Some(StreamHandle::new(stream));
                Ok(())
            }
            Err(e) => {
                warn!(facing = %self.facing, error = %e, "Camera stream request failed");
                Err(e)
            }
        }
    }

    /// Toggle the facing direction.
    ///
    /// When a stream is active the old one is stopped before the new one is requested.
    /// If the new stream cannot be opened the camera is left inactive.
    pub async fn switch_facing(&mut self) -> Result<FacingMode, AcquisitionError> {
        self.facing = self.facing.toggled();

        if self.stream.is_none() {
            return Ok(self.facing);
        }

        self.release_stream();
        match self.device.open(self.facing).await {
            Ok(stream) => {
                self.stream = Some(StreamHandle::new(stream));
                Ok(self.facing)
            }
            Err(e) => {
                warn!(facing = %self.facing, error = %e, "Could not switch camera");
                Err(AcquisitionError::SwitchFailed)
            }
        }
    }

    /// Capture the current frame as JPEG. The stream is released whether or not this succeeds.
    pub fn capture(&mut self) -> Result<EncodedImage, AcquisitionError> {
        let mut handle = self
            .stream
            .take()
            .ok_or(AcquisitionError::StreamInactive)?;
        let frame = handle.current_frame();
        handle.release();

        let image = encode_jpeg(&frame?, self.jpeg_quality)?;
        info!(bytes = image.len(), "Captured camera frame");
        Ok(image)
    }

    /// Stop the camera without capturing
    pub fn cancel(&mut self) {
        self.release_stream();
    }

    fn release_stream(&mut self) {
        if let Some(handle) = self.stream.take() {
            handle.release();
        }
    }
}
