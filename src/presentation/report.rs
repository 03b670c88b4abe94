//! Pure renderers over [`ScanSession`]
//!
//! [`TextReport`] prints the active view for a terminal, [`SessionReport`] is the
//! JSON document. Neither touches session state.

use std::fmt;

use purescan_core::application::{ActiveView, FailureKind, ScanPhase, ScanSession};
use purescan_core::domain::{AnalysisResult, ReviewEntry, ScoreBand, StarRating};
use serde::Serialize;

const MAX_STARS: u8 = 5;

/// JSON view of a session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport<'a> {
    pub phase: ScanPhase,
    pub image: Option<ImageSummary<'a>>,
    pub result: Option<&'a AnalysisResult>,
    pub score_band: Option<ScoreBand>,
    pub error: Option<ErrorSummary<'a>>,
    pub reviews: Vec<&'a ReviewEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary<'a> {
    pub mime_type: &'a str,
    pub bytes: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSummary<'a> {
    pub kind: FailureKind,
    pub message: &'a str,
    pub retryable: bool,
}

impl<'a> From<&'a ScanSession> for SessionReport<'a> {
    fn from(session: &'a ScanSession) -> Self {
        Self {
            phase: session.phase(),
            image: session.image().map(|image| ImageSummary {
                mime_type: image.mime_type(),
                bytes: image.len(),
            }),
            result: session.result(),
            score_band: session.result().map(|r| r.health_score.band()),
            error: session.failure().map(|failure| ErrorSummary {
                kind: failure.kind(),
                message: failure.message(),
                retryable: failure.is_retryable(),
            }),
            reviews: session.reviews().entries().collect(),
        }
    }
}

/// Terminal rendering of the active view
pub struct TextReport<'a>(pub &'a ScanSession);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        match (session.view(), session.result()) {
            (ActiveView::Report, Some(result)) => {
                write_result(f, result)?;
                write_reviews(f, session.reviews().entries())
            }
            (ActiveView::Scanner { analyzing: true, .. }, _) => {
                writeln!(f, "Analyzing product...")
            }
            (
                ActiveView::Scanner {
                    error: Some(message),
                    ..
                },
                _,
            ) => {
                writeln!(f, "Scan failed: {}", message)?;
                if session.failure().is_some_and(|failure| failure.is_retryable()) {
                    writeln!(f, "Try again with a clearer photo or another image.")?;
                }
                Ok(())
            }
            _ => writeln!(f, "No product scanned yet."),
        }
    }
}

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Healthy => "healthy",
        ScoreBand::Moderate => "moderate",
        ScoreBand::Poor => "poor",
    }
}

/// Filled and empty stars, e.g. `★★★☆☆`
pub fn stars(rating: StarRating) -> String {
    let filled = rating.value().min(MAX_STARS) as usize;
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(MAX_STARS as usize - filled)
    )
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    marker: &str,
    items: &[String],
) -> fmt::Result {
    writeln!(f, "{}", title)?;
    if items.is_empty() {
        return writeln!(f, "  (none)");
    }
    for item in items {
        writeln!(f, "  {} {}", marker, item)?;
    }
    Ok(())
}

fn write_result(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    let score = result.health_score;
    writeln!(f, "{}", result.product_name)?;
    writeln!(
        f,
        "{} | Health score {}/100 ({}) | {}",
        result.category,
        score,
        band_label(score.band()),
        result.rating
    )?;
    writeln!(f)?;
    writeln!(f, "{}", result.summary)?;

    if let Some(text) = result.detected_text.as_deref().filter(|t| !t.trim().is_empty()) {
        writeln!(f)?;
        writeln!(f, "Label text: {}", text)?;
    }

    writeln!(f)?;
    write_list(f, "Pros", "+", &result.pros)?;
    write_list(f, "Cons", "-", &result.cons)?;
    if !result.ingredients.is_empty() {
        writeln!(f, "Key ingredients")?;
        writeln!(f, "  {}", result.ingredients.join(", "))?;
    }
    Ok(())
}

fn write_reviews<'a>(
    f: &mut fmt::Formatter<'_>,
    reviews: impl ExactSizeIterator<Item = &'a ReviewEntry>,
) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "Reviews ({})", reviews.len())?;
    for review in reviews {
        writeln!(
            f,
            "  {} {} | {} | {}",
            stars(review.rating()),
            review.author(),
            review.rating().label(),
            review.created_at().format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(f, "    {}", review.comment())?;
    }
    Ok(())
}
