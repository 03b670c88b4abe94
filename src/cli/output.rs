//! Output writer for CLI results
//!
//! Reports go to stdout. Status lines go to stderr so a JSON report stays machine-readable.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON document for machine processing
    Json,
}

/// Output writer configured from global CLI flags
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Section header
    pub fn header(&self, title: &str) {
        if !self.quiet && self.format == OutputFormat::Text {
            eprintln!("\n== {} ==", title);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("OK: {}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("Warning: {}", message);
        }
    }

    /// Errors are printed even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Report body on stdout
    pub fn print(&self, text: &str) {
        println!("{}", text);
    }

    /// Serialize `value` as pretty JSON on stdout
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, value)
            .context("Failed to serialize JSON output")?;
        writeln!(stdout).context("Failed to write JSON output")?;
        Ok(())
    }
}
