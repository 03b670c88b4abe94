//! PureScan Core - foundation crate for the PureScan product scanner
//!
//! # Modules
//!
//! - [`config`] - Layered configuration from TOML files and environment variables
//! - [`domain`] - Analysis results, encoded images, reviews and the analyzer seam
//! - [`application`] - The scan session state machine
//! - [`infrastructure`] - Camera and file image acquisition
//! - [`logging`] - Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! purescan-core/
//! ├── domain/           # Pure value types and the ProductAnalyzer trait
//! ├── application/      # ScanSession
//! ├── infrastructure/
//! │   └── acquisition/  # Camera capture, snapshot camera, file source
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use purescan_core::Config;
//!
//! let config = Config::load()?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{ActiveView, ScanPhase, ScanSession};
pub use config::Config;
pub use logging::init_tracing;
