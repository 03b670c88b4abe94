//! File supply: picker selection or drag-and-drop

use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{debug, info};

use crate::domain::{AcquisitionError, DEFAULT_MIME_TYPE, EncodedImage};

/// Reads user-supplied image files into an [`EncodedImage`].
///
/// No MIME validation happens here beyond what the chooser already filtered.
pub struct FileSource;

impl FileSource {
    /// Read a single selected file
    pub async fn read(path: &Path) -> Result<EncodedImage, AcquisitionError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AcquisitionError::FileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let image = Self::from_bytes(Some(path), bytes);
        info!(
            path = %path.display(),
            mime_type = image.mime_type(),
            bytes = image.len(),
            "Read image file"
        );
        Ok(image)
    }

    /// Read a drop of one or more files. Only the first file is used.
    pub async fn read_drop(paths: &[PathBuf]) -> Result<EncodedImage, AcquisitionError> {
        let first = paths.first().ok_or_else(|| AcquisitionError::FileRead {
            path: String::new(),
            reason: "no file was supplied".to_string(),
        })?;
        if paths.len() > 1 {
            debug!(ignored = paths.len() - 1, "Ignoring extra dropped files");
        }
        Self::read(first).await
    }

    /// Tag already-loaded bytes with a MIME type
    pub fn from_bytes(name: Option<&Path>, bytes: Vec<u8>) -> EncodedImage {
        let mime_type = detect_mime_type(name, &bytes);
        EncodedImage::new(mime_type, bytes)
    }
}

/// MIME type from the file extension, then from the content, then the JPEG default
pub fn detect_mime_type(name: Option<&Path>, bytes: &[u8]) -> &'static str {
    name.and_then(|path| ImageFormat::from_path(path).ok())
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type())
        .unwrap_or(DEFAULT_MIME_TYPE)
}
