//! Error types for subtrack
//!
//! This module defines the error types used throughout the subtrack workspace.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use subtrack_core::error::{Result, SubtrackError};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to SubtrackError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::month::Month;
use crate::types::SubscriptionId;

/// Failure reported by a storage backend
///
/// The aggregator never inspects the cause; it is passed through to the
/// caller unchanged.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error while reading or writing the backing store
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Main error type for subtrack operations
#[derive(Error, Debug)]
pub enum SubtrackError {
    /// A window month could not be parsed as `MM-YYYY`
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// The window ends before it starts
    #[error("Invalid range: end month {end} is before start month {start}")]
    InvalidRange {
        /// Window start
        start: Month,
        /// Window end
        end: Month,
    },

    /// A user identifier filter is not a valid UUID
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Subscription create/update input was rejected
    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),

    /// Pagination parameters out of range
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// No subscription with this id
    #[error("Subscription {0} not found")]
    NotFound(SubscriptionId),

    /// Storage collaborator failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubtrackError {
    /// Whether the error was caused by caller input rather than the system
    ///
    /// Client errors are deterministic functions of the input and retrying
    /// the same request cannot succeed.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidWindow(_)
                | Self::InvalidRange { .. }
                | Self::InvalidUserId(_)
                | Self::InvalidSubscription(_)
                | Self::InvalidPage(_)
                | Self::NotFound(_)
        )
    }
}

/// Convenience type alias for Results in subtrack
///
/// # Example
///
/// ```
/// use subtrack_core::Result;
///
/// fn process_data() -> Result<u64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, SubtrackError>;
