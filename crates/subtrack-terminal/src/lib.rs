//! Terminal output formatting for subtrack
//!
//! This crate provides table and JSON formatters for subscription listings,
//! window totals and per-subscription breakdowns.

pub mod output;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
