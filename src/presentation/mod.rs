//! Report rendering for a scan session

pub mod report;

pub use report::{SessionReport, TextReport};
