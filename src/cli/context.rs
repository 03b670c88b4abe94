//! CLI Context - configuration and output shared by every command

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use purescan_core::config::{Config, LoggingConfig};
use purescan_core::init_tracing;

use crate::cli::Cli;
use crate::cli::output::OutputWriter;

/// Context for CLI operations
pub struct CliContext {
    /// Application configuration
    pub config: Arc<Config>,

    /// Output writer configured based on CLI flags
    pub output: OutputWriter,
}

impl CliContext {
    /// Create a new CLI context from parsed CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = Self::load_config(cli.config.as_deref())?;

        let logging = Self::effective_logging(&config.logging, cli.verbose, cli.quiet);
        init_tracing(&logging).context("Failed to initialize logging")?;
        tracing::debug!(
            model = %config.llm.default_model,
            provider = %config.llm.provider,
            "Configuration loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            output: OutputWriter::new(cli.format.into(), cli.quiet, cli.verbose),
        })
    }

    /// Load configuration from the layered sources plus an optional explicit file
    fn load_config(config_path: Option<&Path>) -> Result<Config> {
        Config::load_with(config_path).context("Failed to load configuration")
    }

    /// `--verbose` and `--quiet` override the configured log level
    fn effective_logging(base: &LoggingConfig, verbose: bool, quiet: bool) -> LoggingConfig {
        let mut logging = base.clone();
        if verbose {
            logging.level = "debug".to_string();
        } else if quiet {
            logging.level = "error".to_string();
        }
        logging
    }
}
