//! Billing aggregation for subtrack
//!
//! This crate validates query windows and totals subscription spend over
//! them, clipping each subscription to the window month by month.

pub mod aggregator;
pub mod query;

pub use aggregator::{BillingAggregator, Breakdown, Contribution};
pub use query::{BillingQuery, RawWindow};
