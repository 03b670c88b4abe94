//! Scan session state machine
//!
//! A session moves `Idle -> Capturing -> Completed | Failed` and back to `Idle` on reset.
//! Every transition is a synchronous `&mut self` call, so no observer can see a half-updated
//! session. A second scan cannot start while one is in flight: [`ScanSession::begin_scan`]
//! refuses it, and completion requires the [`ScanTicket`] handed out when the scan began.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    AcquisitionError, AnalysisError, AnalysisResult, EncodedImage, ProductAnalyzer, ReviewDraft,
    ReviewEntry, ReviewStore, ReviewValidationError,
};

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Idle,
    Capturing,
    Completed,
    Failed,
}

/// What kind of failure ended the last scan attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Camera or file could not provide an image
    Acquisition,
    /// The analysis service rejected or lacked a credential
    Credential,
    /// Service unreachable or unavailable
    Transport,
    /// The service answered, but with nothing usable
    InvalidResponse,
}

/// Error stored in the session after a failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    kind: FailureKind,
    message: String,
    detail: String,
}

impl ScanFailure {
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Message shown to the user
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Full error text, for logs
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Whether repeating the acquisition step may help
    pub fn is_retryable(&self) -> bool {
        self.kind != FailureKind::Credential
    }
}

impl From<AcquisitionError> for ScanFailure {
    fn from(err: AcquisitionError) -> Self {
        Self {
            kind: FailureKind::Acquisition,
            message: err.to_string(),
            detail: err.to_string(),
        }
    }
}

impl From<AnalysisError> for ScanFailure {
    fn from(err: AnalysisError) -> Self {
        let kind = match err {
            AnalysisError::Credential(_) => FailureKind::Credential,
            AnalysisError::Transport(_) => FailureKind::Transport,
            AnalysisError::EmptyResponse | AnalysisError::SchemaViolation(_) => {
                FailureKind::InvalidResponse
            }
        };
        Self {
            kind,
            message: err.user_message(),
            detail: err.to_string(),
        }
    }
}

/// View derived from session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveView {
    /// Acquisition surface. Disabled while `analyzing`, with the last error if any.
    Scanner {
        analyzing: bool,
        error: Option<String>,
    },
    /// Analysis report and review feed
    Report,
}

/// Rejected state transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("A scan is already in progress")]
    ScanInFlight,

    #[error("Scan ticket does not belong to the scan in progress")]
    StaleTicket,
}

/// Proof that a scan was started. Needed to complete it, and usable once.
#[derive(Debug)]
#[must_use = "a scan can only be completed with its ticket"]
pub struct ScanTicket {
    id: u64,
}

#[derive(Debug)]
enum SessionState {
    Idle,
    Capturing {
        image: EncodedImage,
        ticket: u64,
    },
    Completed {
        image: EncodedImage,
        result: AnalysisResult,
    },
    Failed {
        image: Option<EncodedImage>,
        failure: ScanFailure,
    },
}

/// The single live scan session
#[derive(Debug)]
pub struct ScanSession {
    state: SessionState,
    reviews: ReviewStore,
    next_ticket: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            reviews: ReviewStore::new(),
            next_ticket: 1,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        match self.state {
            SessionState::Idle => ScanPhase::Idle,
            SessionState::Capturing { .. } => ScanPhase::Capturing,
            SessionState::Completed { .. } => ScanPhase::Completed,
            SessionState::Failed { .. } => ScanPhase::Failed,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, SessionState::Capturing { .. })
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Capturing { image, .. } | SessionState::Completed { image, .. } => {
                Some(image)
            }
            SessionState::Failed { image, .. } => image.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SessionState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ScanFailure> {
        match &self.state {
            SessionState::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.failure().map(ScanFailure::message)
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }

    pub fn view(&self) -> ActiveView {
        match &self.state {
            SessionState::Completed { .. } => ActiveView::Report,
            SessionState::Idle => ActiveView::Scanner {
                analyzing: false,
                error: None,
            },
            SessionState::Capturing { .. } => ActiveView::Scanner {
                analyzing: true,
                error: None,
            },
            SessionState::Failed { failure, .. } => ActiveView::Scanner {
                analyzing: false,
                error: Some(failure.message().to_string()),
            },
        }
    }

    /// Store a freshly acquired image and mark the analysis as in flight.
    ///
    /// Clears any previous result, error and reviews. Refused while a scan is in flight.
    pub fn begin_scan(&mut self, image: EncodedImage) -> Result<ScanTicket, SessionError> {
        if self.is_in_flight() {
            warn!("Rejected acquisition while a scan is in flight");
            return Err(SessionError::ScanInFlight);
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.reviews.clear();

        info!(
            scan = id,
            mime_type = image.mime_type(),
            bytes = image.len(),
            "Scan started"
        );
        self.state = SessionState::Capturing { image, ticket: id };
        Ok(ScanTicket { id })
    }

    /// Apply the outcome of the analysis started with `ticket`
    pub fn finish_scan(
        &mut self,
        ticket: ScanTicket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<ScanPhase, SessionError> {
        let image = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Capturing { image, ticket: id } if id == ticket.id => image,
            other => {
                self.state = other;
                return Err(SessionError::StaleTicket);
            }
        };

        match outcome {
            Ok(result) => {
                info!(
                    scan = ticket.id,
                    product = %result.product_name,
                    score = result.health_score.value(),
                    "Scan completed"
                );
                self.reviews.seed(ReviewEntry::synthetic(&result));
                self.state = SessionState::Completed { image, result };
                Ok(ScanPhase::Completed)
            }
            Err(err) => {
                warn!(scan = ticket.id, error = %err, "Scan failed");
                self.state = SessionState::Failed {
                    image: Some(image),
                    failure: err.into(),
                };
                Ok(ScanPhase::Failed)
            }
        }
    }

    /// Run one full scan against `analyzer`
    pub async fn scan(
        &mut self,
        analyzer: &dyn ProductAnalyzer,
        image: EncodedImage,
    ) -> Result<ScanPhase, SessionError> {
        let ticket = self.begin_scan(image)?;
        let outcome = match self.image() {
            Some(image) => analyzer.analyze(image).await,
            None => return Err(SessionError::StaleTicket),
        };
        self.finish_scan(ticket, outcome)
    }

    /// Record that no image could be acquired
    pub fn record_acquisition_failure(
        &mut self,
        err: AcquisitionError,
    ) -> Result<(), SessionError> {
        if self.is_in_flight() {
            return Err(SessionError::ScanInFlight);
        }
        warn!(error = %err, "Image acquisition failed");
        self.reviews.clear();
        self.state = SessionState::Failed {
            image: None,
            failure: err.into(),
        };
        Ok(())
    }

    /// Wipe image, result, error and reviews. Refused while a scan is in flight.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.is_in_flight() {
            return Err(SessionError::ScanInFlight);
        }
        debug!("Session reset");
        self.state = SessionState::Idle;
        self.reviews.clear();
        Ok(())
    }

    /// Validate and prepend a user review. Only a completed scan accepts reviews.
    pub fn submit_review(
        &mut self,
        draft: ReviewDraft,
    ) -> Result<&ReviewEntry, ReviewValidationError> {
        if self.phase() != ScanPhase::Completed {
            debug!(phase = ?self.phase(), "Review rejected outside the report view");
            return Err(ReviewValidationError::NoReport);
        }
        self.reviews.append(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GENERIC_ANALYSIS_FAILURE, HealthRating, HealthScore, ProductCategory};

    fn image() -> EncodedImage {
        EncodedImage::new("image/png", vec![1, 2, 3])
    }

    fn result(score: u8) -> AnalysisResult {
        AnalysisResult {
            product_name: "Cough Syrup".to_string(),
            category: ProductCategory::MedicineSupplement,
            health_score: HealthScore::new(score).unwrap(),
            summary: "High sugar content.".to_string(),
            pros: vec!["Soothes throat".to_string()],
            cons: vec!["Sugar".to_string()],
            ingredients: vec!["Dextromethorphan".to_string()],
            rating: HealthRating::Neutral,
            detected_text: None,
        }
    }

    fn assert_pristine(session: &ScanSession) {
        assert_eq!(session.phase(), ScanPhase::Idle);
        assert!(session.image().is_none());
        assert!(session.result().is_none());
        assert!(session.error_message().is_none());
        assert!(session.reviews().is_empty());
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ScanSession::new();
        assert_pristine(&session);
        assert_eq!(
            session.view(),
            ActiveView::Scanner {
                analyzing: false,
                error: None
            }
        );
    }

    #[test]
    fn test_success_seeds_one_review() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        assert!(session.is_in_flight());
        assert_eq!(
            session.view(),
            ActiveView::Scanner {
                analyzing: true,
                error: None
            }
        );

        let phase = session.finish_scan(ticket, Ok(result(60))).unwrap();

        assert_eq!(phase, ScanPhase::Completed);
        assert_eq!(session.view(), ActiveView::Report);
        assert_eq!(session.result().unwrap().health_score.value(), 60);
        assert_eq!(session.reviews().len(), 1);
        let seed = session.reviews().latest().unwrap();
        assert_eq!(seed.rating().value(), 3);
        assert!(seed.comment().contains("60/100"));
        assert!(seed.comment().contains("High sugar content."));
    }

    #[test]
    fn test_second_acquisition_rejected_while_in_flight() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();

        let err = session
            .begin_scan(EncodedImage::new("image/jpeg", vec![9]))
            .unwrap_err();
        assert_eq!(err, SessionError::ScanInFlight);
        assert_eq!(session.image().unwrap().mime_type(), "image/png");

        assert_eq!(
            session.record_acquisition_failure(AcquisitionError::PermissionDenied),
            Err(SessionError::ScanInFlight)
        );
        assert_eq!(session.reset(), Err(SessionError::ScanInFlight));

        session.finish_scan(ticket, Ok(result(90))).unwrap();
        assert_eq!(session.phase(), ScanPhase::Completed);
    }

    #[test]
    fn test_failure_retains_image() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        session
            .finish_scan(ticket, Err(AnalysisError::Transport("timeout".into())))
            .unwrap();

        assert_eq!(session.phase(), ScanPhase::Failed);
        assert!(!session.is_in_flight());
        assert!(session.image().is_some());
        assert!(session.result().is_none());
        assert!(session.reviews().is_empty());
        assert_eq!(session.error_message(), Some(GENERIC_ANALYSIS_FAILURE));
        assert_eq!(session.failure().unwrap().kind(), FailureKind::Transport);
        assert!(session.failure().unwrap().is_retryable());
    }

    #[test]
    fn test_credential_failure_surfaces_verbatim() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        session
            .finish_scan(
                ticket,
                Err(AnalysisError::Credential("API Key is invalid".into())),
            )
            .unwrap();

        let failure = session.failure().unwrap();
        assert_eq!(failure.kind(), FailureKind::Credential);
        assert_eq!(failure.message(), "API Key is invalid");
        assert!(!failure.is_retryable());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        session.finish_scan(ticket, Ok(result(85))).unwrap();
        session
            .submit_review(ReviewDraft::new("Alice", 4, "Good"))
            .unwrap();

        session.reset().unwrap();
        assert_pristine(&session);
        session.reset().unwrap();
        assert_pristine(&session);
    }

    #[test]
    fn test_reset_from_failed() {
        let mut session = ScanSession::new();
        session
            .record_acquisition_failure(AcquisitionError::PermissionDenied)
            .unwrap();
        assert_eq!(session.phase(), ScanPhase::Failed);
        assert!(session.image().is_none());
        assert_eq!(session.failure().unwrap().kind(), FailureKind::Acquisition);

        session.reset().unwrap();
        assert_pristine(&session);
    }

    #[test]
    fn test_new_scan_replaces_previous_session_wholesale() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        session.finish_scan(ticket, Ok(result(85))).unwrap();
        session
            .submit_review(ReviewDraft::new("Alice", 4, "Good"))
            .unwrap();
        assert_eq!(session.reviews().len(), 2);

        let ticket = session
            .begin_scan(EncodedImage::new("image/jpeg", vec![7]))
            .unwrap();
        assert!(session.result().is_none());
        assert!(session.reviews().is_empty());

        session.finish_scan(ticket, Ok(result(10))).unwrap();
        assert_eq!(session.reviews().len(), 1);
        assert_eq!(session.reviews().latest().unwrap().rating().value(), 1);
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut session = ScanSession::new();
        let old = session.begin_scan(image()).unwrap();
        session.finish_scan(old, Ok(result(50))).unwrap();

        let current = session.begin_scan(image()).unwrap();
        let forged = ScanTicket { id: 999 };
        assert_eq!(
            session.finish_scan(forged, Ok(result(50))),
            Err(SessionError::StaleTicket)
        );
        assert!(session.is_in_flight());

        session.finish_scan(current, Ok(result(50))).unwrap();
        assert_eq!(session.phase(), ScanPhase::Completed);
    }

    #[test]
    fn test_invalid_review_does_not_touch_session() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        session.finish_scan(ticket, Ok(result(85))).unwrap();

        let err = session
            .submit_review(ReviewDraft::new("Alice", 4, "   "))
            .unwrap_err();
        assert_eq!(err, ReviewValidationError::EmptyComment);
        assert_eq!(session.reviews().len(), 1);
        assert_eq!(session.phase(), ScanPhase::Completed);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_review_rejected_without_report() {
        let mut session = ScanSession::new();
        assert_eq!(
            session.submit_review(ReviewDraft::new("Alice", 4, "Good")).unwrap_err(),
            ReviewValidationError::NoReport
        );
        assert_pristine(&session);

        let ticket = session.begin_scan(image()).unwrap();
        assert_eq!(
            session.submit_review(ReviewDraft::new("Bob", 5, "Great")).unwrap_err(),
            ReviewValidationError::NoReport
        );
        assert!(session.reviews().is_empty());

        session.finish_scan(ticket, Ok(result(85))).unwrap();
        let authors: Vec<_> = session.reviews().entries().map(|r| r.author()).collect();
        assert_eq!(authors, vec![crate::domain::review::SYNTHETIC_REVIEWER]);
    }

    #[test]
    fn test_review_rejected_after_failure() {
        let mut session = ScanSession::new();
        let ticket = session.begin_scan(image()).unwrap();
        session
            .finish_scan(ticket, Err(AnalysisError::EmptyResponse))
            .unwrap();

        assert_eq!(
            session.submit_review(ReviewDraft::new("Alice", 4, "Good")).unwrap_err(),
            ReviewValidationError::NoReport
        );
        assert!(session.reviews().is_empty());
        assert_eq!(session.phase(), ScanPhase::Failed);
    }
}
