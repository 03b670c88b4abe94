//! CLI Commands Module

pub mod scan;
