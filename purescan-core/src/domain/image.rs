//! Encoded image payloads and camera facing direction

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::domain::error::AcquisitionError;

/// MIME type assumed when a payload carries no usable header
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Which physical camera a capture stream targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera, pointed away from the user
    #[default]
    Environment,
    /// Front camera
    User,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }

    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header and payload of a possibly data-URI encoded string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUriParts<'a> {
    pub mime_type: String,
    pub payload: &'a str,
}

/// Split a `data:<mime>;base64,<payload>` string into MIME type and payload.
///
/// A string without a single base64 marker is treated as a bare payload. The MIME type
/// falls back to [`DEFAULT_MIME_TYPE`] whenever the header is absent or malformed.
pub fn split_data_uri(encoded: &str) -> DataUriParts<'_> {
    let mut parts = encoded.split(BASE64_MARKER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(payload), None) => {
            let mime_type = prefix
                .strip_prefix(DATA_URI_SCHEME)
                .map(str::trim)
                .filter(|mime| !mime.is_empty())
                .unwrap_or(DEFAULT_MIME_TYPE);
            DataUriParts {
                mime_type: mime_type.to_string(),
                payload,
            }
        }
        _ => DataUriParts {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            payload: encoded,
        },
    }
}

/// An immutable image payload tagged with its MIME type.
///
/// One is produced per scan attempt, either by capturing a camera frame or by reading a file.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wrap raw bytes. An empty MIME type falls back to [`DEFAULT_MIME_TYPE`].
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            mime_type.trim().to_string()
        };
        Self { mime_type, bytes }
    }

    /// Parse a data URI or a bare base64 string
    pub fn from_data_uri(encoded: &str) -> Result<Self, AcquisitionError> {
        let parts = split_data_uri(encoded.trim());
        // Line-wrapped base64 (e.g. coreutils `base64` output) decodes once whitespace is gone.
        let payload: String = parts
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| AcquisitionError::InvalidEncoding(e.to_string()))?;
        Ok(Self::new(parts.mime_type, bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 encoding of the payload, without header
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "{}{}{}{}",
            DATA_URI_SCHEME,
            self.mime_type,
            BASE64_MARKER,
            self.to_base64()
        )
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
