//! PureScan - application library
//!
//! Wires the core session and acquisition layer to the LLM analysis client and
//! exposes the CLI and report rendering.

pub mod app;
pub mod cli;
pub mod presentation;

pub use app::{build_analyzer, build_camera};
pub use purescan_core::{Config, init_tracing};

pub use purescan_core;
pub use purescan_llm;
