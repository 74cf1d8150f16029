//! Core types, traits, and utilities for subtrack
//!
//! This crate provides the month-granularity date model, the subscription
//! domain types, error handling, the clock abstraction, and the repository
//! traits shared by every other subtrack crate.

pub mod clock;
pub mod error;
pub mod month;
pub mod repository;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, StorageError, SubtrackError};
pub use month::{Month, MonthRange, months_between};
pub use repository::{CandidateFilter, CandidateSource, SubscriptionRepository};
pub use types::{Page, PageRequest, Subscription, SubscriptionId, UserId};
