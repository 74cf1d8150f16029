//! Query window parsing and validation
//!
//! A [`RawWindow`] holds the caller's strings exactly as received. Turning it
//! into a [`BillingQuery`] performs every input check up front, so a bad
//! request never reaches storage. Checks run in a fixed order: window months,
//! then their ordering, then the user filter.

use serde::{Deserialize, Serialize};
use subtrack_core::error::{Result, SubtrackError};
use subtrack_core::month::{Month, MonthRange};
use subtrack_core::repository::CandidateFilter;
use subtrack_core::types::UserId;

/// Unvalidated aggregation request
///
/// Empty `user_id` or `service_name` strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWindow {
    /// `MM-YYYY`
    pub start_month: String,
    /// `MM-YYYY`
    pub end_month: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
}

impl RawWindow {
    pub fn new(start_month: impl Into<String>, end_month: impl Into<String>) -> Self {
        Self {
            start_month: start_month.into(),
            end_month: end_month.into(),
            user_id: None,
            service_name: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }
}

/// A validated aggregation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingQuery {
    pub window: MonthRange,
    pub user_id: Option<UserId>,
    pub service_name: Option<String>,
}

impl BillingQuery {
    /// Validate a raw window
    ///
    /// # Errors
    ///
    /// - [`SubtrackError::InvalidWindow`] if either month is not `MM-YYYY`
    /// - [`SubtrackError::InvalidRange`] if the end precedes the start
    /// - [`SubtrackError::InvalidUserId`] if a user filter is not a UUID
    pub fn parse(raw: &RawWindow) -> Result<Self> {
        let start = parse_window_month("start_month", &raw.start_month)?;
        let end = parse_window_month("end_month", &raw.end_month)?;
        let window =
            MonthRange::new(start, end).map_err(|_| SubtrackError::InvalidRange { start, end })?;

        let user_id = match non_empty(&raw.user_id) {
            Some(s) => Some(UserId::parse(s)?),
            None => None,
        };

        Ok(Self {
            window,
            user_id,
            service_name: non_empty(&raw.service_name).map(str::to_string),
        })
    }

    /// The storage-side selection for this query
    pub fn candidate_filter(&self) -> CandidateFilter {
        CandidateFilter {
            window_start: self.window.start(),
            window_end: self.window.end(),
            user_id: self.user_id,
            service_name: self.service_name.clone(),
        }
    }
}

fn parse_window_month(field: &str, value: &str) -> Result<Month> {
    Month::parse(value).map_err(|e| SubtrackError::InvalidWindow(format!("{field}: {e}")))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
