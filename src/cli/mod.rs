//! PureScan CLI - scan a product photo from the command line
//!
//! ## Features
//! - File supply: the first of the given image files is analyzed
//! - Camera capture: one frame from the configured snapshot camera
//! - Inline data URIs
//! - Optional user review appended to the report
//! - Text or JSON report with CI-friendly exit codes

pub mod commands;
mod context;
mod output;

pub use context::CliContext;
pub use output::{OutputFormat, OutputWriter};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// PureScan - product health and safety assessment from a photo
#[derive(Parser, Debug)]
#[command(
    name = "purescan",
    version,
    about = "Scan a food, skincare or medicine product and get a health assessment",
    long_about = "PureScan sends a product photo to a multimodal model and reports the product \
                  name, category, a 0-100 health score, pros, cons and key ingredients.\n\n\
                  Set GEMINI_API_KEY (or API_KEY) before scanning."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: CliOutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors and the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Acquire one image and analyze it
    #[command(visible_alias = "s")]
    Scan(commands::scan::ScanArgs),
}

/// Output format for CLI results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CliOutputFormat {
    /// Human-readable report (default)
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    context: CliContext,
}

impl CliApp {
    /// Create a new CLI application instance
    pub fn new() -> anyhow::Result<Self> {
        let cli = Cli::parse();
        let context = CliContext::new(&cli)?;
        Ok(Self { cli, context })
    }

    /// Run the CLI application
    pub async fn run(self) -> anyhow::Result<i32> {
        let exit_code = match self.cli.command {
            Commands::Scan(ref args) => commands::scan::run(&self.context, args).await,
        }?;

        Ok(exit_code)
    }
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Analysis completed
    pub const SUCCESS: i32 = 0;
    /// The service answered without a usable analysis
    pub const ANALYSIS_FAILED: i32 = 1;
    /// Configuration or input error
    pub const CONFIG_ERROR: i32 = 2;
    /// Analysis service unreachable or unavailable
    pub const NETWORK_ERROR: i32 = 3;
    /// API key missing or rejected
    pub const AUTH_REQUIRED: i32 = 5;
    /// No image could be acquired
    pub const ACQUISITION_ERROR: i32 = 6;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = 99;
}
