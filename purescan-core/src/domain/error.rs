//! Classified errors for acquisition, analysis and review submission

use crate::domain::image::FacingMode;

/// User-facing message for every analysis failure except credential problems.
pub const GENERIC_ANALYSIS_FAILURE: &str = "Failed to analyze product. Please try again with a clearer image or check your internet connection.";

/// Failure to obtain an image from the camera or from a file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Unable to access camera. Please allow permissions or try uploading a file.")]
    PermissionDenied,

    #[error("No {0} camera is available. Try uploading a file instead.")]
    NoDevice(FacingMode),

    #[error("Camera is busy: {0}")]
    DeviceBusy(String),

    #[error("Could not switch camera.")]
    SwitchFailed,

    #[error("Camera is not active")]
    StreamInactive,

    #[error("Could not read image file {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("Could not encode captured frame: {0}")]
    Encode(String),

    #[error("Image payload is not valid base64: {0}")]
    InvalidEncoding(String),
}

/// Failure of the remote analysis call, classified by the corrective action it needs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Missing or rejected credential. Surfaced verbatim.
    #[error("{0}")]
    Credential(String),

    /// Network failure or the service being unavailable
    #[error("Analysis service unreachable: {0}")]
    Transport(String),

    /// The service answered without any response text
    #[error("Analysis service returned an empty response")]
    EmptyResponse,

    /// The response text did not match the output schema
    #[error("Analysis response violated the output schema: {0}")]
    SchemaViolation(String),
}

impl AnalysisError {
    /// The message shown to the user.
    ///
    /// Credential problems need a configuration fix rather than a retry, so they are
    /// never masked by the generic message.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Credential(message) => message.clone(),
            AnalysisError::Transport(_)
            | AnalysisError::EmptyResponse
            | AnalysisError::SchemaViolation(_) => GENERIC_ANALYSIS_FAILURE.to_string(),
        }
    }

    /// Whether repeating the acquisition step may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AnalysisError::Credential(_))
    }
}

/// Rejected review submission. Never leaves the review store boundary as a session error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("Reviewer name must not be empty")]
    EmptyAuthor,

    #[error("Review comment must not be empty")]
    EmptyComment,

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("Reviews can only be added to a completed scan")]
    NoReport,
}
