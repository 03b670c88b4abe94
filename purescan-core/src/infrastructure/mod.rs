//! Device and file integrations

pub mod acquisition;
