//! Structured product assessment returned by the analysis service

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::AnalysisError;
use crate::domain::image::EncodedImage;
use crate::domain::review::StarRating;

/// Product category. Any other value from the service is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "Food")]
    Food,
    #[serde(rename = "Beauty/Skincare")]
    BeautySkincare,
    #[serde(rename = "Medicine/Supplement")]
    MedicineSupplement,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 4] = [
        ProductCategory::Food,
        ProductCategory::BeautySkincare,
        ProductCategory::MedicineSupplement,
        ProductCategory::Unknown,
    ];

    /// Wire name, as it appears in the output schema
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Food => "Food",
            ProductCategory::BeautySkincare => "Beauty/Skincare",
            ProductCategory::MedicineSupplement => "Medicine/Supplement",
            ProductCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall verdict. Supplied by the service independently of the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthRating {
    #[serde(rename = "Toxic/Avoid")]
    ToxicAvoid,
    #[serde(rename = "Bad")]
    Bad,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Excellent")]
    Excellent,
}

impl HealthRating {
    pub const ALL: [HealthRating; 5] = [
        HealthRating::ToxicAvoid,
        HealthRating::Bad,
        HealthRating::Neutral,
        HealthRating::Good,
        HealthRating::Excellent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthRating::ToxicAvoid => "Toxic/Avoid",
            HealthRating::Bad => "Bad",
            HealthRating::Neutral => "Neutral",
            HealthRating::Good => "Good",
            HealthRating::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for HealthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score band shared by the report colouring and the synthetic review seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// 80 and above
    Healthy,
    /// 50 to 79
    Moderate,
    /// Below 50
    Poor,
}

/// Health score, always within `0..=100`.
///
/// Deserialization rejects out-of-range and non-integer values instead of clamping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct HealthScore(u8);

impl HealthScore {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> ScoreBand {
        match self.0 {
            80.. => ScoreBand::Healthy,
            50..=79 => ScoreBand::Moderate,
            _ => ScoreBand::Poor,
        }
    }

    /// Star rating given by the synthetic reviewer
    pub fn seeded_stars(&self) -> StarRating {
        match self.band() {
            ScoreBand::Healthy => StarRating::FIVE,
            ScoreBand::Moderate => StarRating::THREE,
            ScoreBand::Poor => StarRating::ONE,
        }
    }
}

impl TryFrom<i64> for HealthScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(HealthScore::new)
            .ok_or_else(|| format!("healthScore {value} is outside 0..=100"))
    }
}

impl From<HealthScore> for u8 {
    fn from(score: HealthScore) -> Self {
        score.0
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parsed structured response for one successful scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub product_name: String,
    pub category: ProductCategory,
    pub health_score: HealthScore,
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub rating: HealthRating,
    /// Label text the model read off the package, when it reports any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_text: Option<String>,
}

/// Remote image analysis capability consumed by the scan session
#[async_trait]
pub trait ProductAnalyzer: Send + Sync {
    /// Analyze one image. A single call; failures are returned, never retried.
    async fn analyze(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError>;
}
