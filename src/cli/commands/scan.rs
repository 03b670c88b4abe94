//! Scan Command - acquire one product image and analyze it
//!
//! The image comes from files (first one wins), an inline data URI, or one frame of the
//! snapshot camera. The session is rendered once the analysis settles.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, ValueEnum};
use purescan_core::application::{FailureKind, ScanSession};
use purescan_core::config::CameraConfig;
use purescan_core::domain::{AcquisitionError, AnalysisError, EncodedImage, FacingMode, ReviewDraft};
use purescan_core::infrastructure::acquisition::FileSource;

use crate::app;
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::OutputFormat;
use crate::presentation::{SessionReport, TextReport};

/// Camera facing direction
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliFacing {
    /// Rear camera
    Environment,
    /// Front camera
    User,
}

impl From<CliFacing> for FacingMode {
    fn from(facing: CliFacing) -> Self {
        match facing {
            CliFacing::Environment => FacingMode::Environment,
            CliFacing::User => FacingMode::User,
        }
    }
}

/// Arguments for the scan command
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["files", "camera", "data_uri"])
))]
pub struct ScanArgs {
    /// Image files to analyze. Only the first one is used.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Capture one frame from the camera
    #[arg(long)]
    pub camera: bool,

    /// Camera to start with (defaults to capture.default_facing)
    #[arg(long, value_enum, conflicts_with_all = ["files", "data_uri"])]
    pub facing: Option<CliFacing>,

    /// Switch to the other camera before capturing
    #[arg(long, conflicts_with_all = ["files", "data_uri"])]
    pub switch_facing: bool,

    /// Frame file backing the rear camera
    #[arg(long, value_name = "PATH", conflicts_with_all = ["files", "data_uri"])]
    pub frame_env: Option<PathBuf>,

    /// Frame file backing the front camera
    #[arg(long, value_name = "PATH", conflicts_with_all = ["files", "data_uri"])]
    pub frame_user: Option<PathBuf>,

    /// Analyze an inline image data URI (or bare base64 JPEG)
    #[arg(long, value_name = "STRING")]
    pub data_uri: Option<String>,

    /// Reviewer name for a review appended after a successful scan
    #[arg(long, value_name = "NAME", requires_all = ["review_rating", "review_comment"])]
    pub review_author: Option<String>,

    /// Review rating from 1 to 5
    #[arg(long, value_name = "N", allow_negative_numbers = true, requires = "review_author")]
    pub review_rating: Option<i64>,

    /// Review text
    #[arg(long, value_name = "TEXT", requires = "review_author")]
    pub review_comment: Option<String>,
}

impl ScanArgs {
    fn review_draft(&self) -> Option<ReviewDraft> {
        match (&self.review_author, self.review_rating, &self.review_comment) {
            (Some(author), Some(rating), Some(comment)) => {
                Some(ReviewDraft::new(author.clone(), rating, comment.clone()))
            }
            _ => None,
        }
    }

    fn camera_config(&self, base: &CameraConfig) -> CameraConfig {
        CameraConfig {
            environment_frame: self
                .frame_env
                .clone()
                .or_else(|| base.environment_frame.clone()),
            user_frame: self.frame_user.clone().or_else(|| base.user_frame.clone()),
        }
    }
}

/// Run the scan command
pub async fn run(ctx: &CliContext, args: &ScanArgs) -> Result<i32> {
    ctx.output.header("Product Scan");

    let mut session = ScanSession::new();

    let image = match acquire(ctx, args).await {
        Ok(image) => image,
        Err(err) => {
            session.record_acquisition_failure(err)?;
            render(ctx, &session)?;
            return Ok(exit_code(&session));
        }
    };
    ctx.output.info(&format!(
        "Analyzing {} image ({} bytes)...",
        image.mime_type(),
        image.len()
    ));

    match app::build_analyzer(&ctx.config.llm) {
        Ok(analyzer) => {
            session.scan(analyzer.as_ref(), image).await?;
        }
        Err(err) => {
            tracing::warn!(error = %err, "Analysis client unavailable");
            let ticket = session.begin_scan(image)?;
            session.finish_scan(ticket, Err(AnalysisError::from(err)))?;
        }
    }

    if let Some(draft) = args.review_draft() {
        match session.submit_review(draft) {
            Ok(entry) => ctx.output.success(&format!("Review by {} added", entry.author())),
            Err(err) => ctx.output.warn(&format!("Review not added: {}", err)),
        }
    }

    render(ctx, &session)?;
    Ok(exit_code(&session))
}

async fn acquire(ctx: &CliContext, args: &ScanArgs) -> Result<EncodedImage, AcquisitionError> {
    if let Some(encoded) = args.data_uri.as_deref() {
        return EncodedImage::from_data_uri(encoded.trim());
    }

    if args.camera {
        let camera_config = args.camera_config(&ctx.config.camera);
        let mut camera = app::build_camera(
            &ctx.config,
            &camera_config,
            args.facing.map(FacingMode::from),
        );
        camera.start().await?;
        if args.switch_facing {
            let facing = camera.switch_facing().await?;
            ctx.output.info(&format!("Switched to {} camera", facing));
        }
        return camera.capture();
    }

    if args.files.len() > 1 {
        ctx.output.warn(&format!(
            "{} files given, analyzing only {}",
            args.files.len(),
            args.files[0].display()
        ));
    }
    FileSource::read_drop(&args.files).await
}

fn render(ctx: &CliContext, session: &ScanSession) -> Result<()> {
    if let Some(failure) = session.failure()
        && ctx.output.is_verbose()
    {
        ctx.output.error(failure.detail());
    }

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&SessionReport::from(session))?,
        OutputFormat::Text => ctx.output.print(TextReport(session).to_string().trim_end()),
    }
    Ok(())
}

fn exit_code(session: &ScanSession) -> i32 {
    match session.failure().map(|failure| failure.kind()) {
        None => exit_codes::SUCCESS,
        Some(FailureKind::Acquisition) => exit_codes::ACQUISITION_ERROR,
        Some(FailureKind::Credential) => exit_codes::AUTH_REQUIRED,
        Some(FailureKind::Transport) => exit_codes::NETWORK_ERROR,
        Some(FailureKind::InvalidResponse) => exit_codes::ANALYSIS_FAILED,
    }
}
