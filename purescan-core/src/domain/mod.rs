//! Domain model for product scans

pub mod analysis;
pub mod error;
pub mod image;
pub mod review;

pub use analysis::{
    AnalysisResult, HealthRating, HealthScore, ProductAnalyzer, ProductCategory, ScoreBand,
};
pub use error::{AcquisitionError, AnalysisError, GENERIC_ANALYSIS_FAILURE, ReviewValidationError};
pub use image::{DEFAULT_MIME_TYPE, EncodedImage, FacingMode};
pub use review::{ReviewDraft, ReviewEntry, ReviewId, ReviewStore, StarRating};
