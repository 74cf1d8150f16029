//! Core domain types for subtrack
//!
//! This module contains the subscription record, its identifiers, the
//! validated inputs used to create and update records, and pagination.
//! Raw inputs arrive as strings (from a CLI or any other front-end) and are
//! turned into typed values by the `validate` methods here, so stores only
//! ever see well-formed data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, SubtrackError};
use crate::month::Month;

/// Store-assigned subscription identifier
///
/// # Examples
/// ```
/// use subtrack_core::types::SubscriptionId;
///
/// let id: SubscriptionId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Strongly-typed user identifier
///
/// # Examples
/// ```
/// use subtrack_core::types::UserId;
///
/// let user = UserId::parse("60601fee-2bf1-4721-ae6f-7636e79a0cba").unwrap();
/// assert_eq!(user.to_string(), "60601fee-2bf1-4721-ae6f-7636e79a0cba");
/// assert!(UserId::parse("not-a-uuid").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap a UUID
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a UUID string, failing with [`SubtrackError::InvalidUserId`]
    pub fn parse(input: &str) -> Result<Self> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| SubtrackError::InvalidUserId(format!("'{input}': {e}")))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recurring subscription record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Store-assigned identifier
    pub id: SubscriptionId,
    /// Name of the subscribed service
    pub service_name: String,
    /// Monthly price in whole currency units
    pub price: u64,
    /// Owner of the subscription
    pub user_id: UserId,
    /// First billed month
    pub start_month: Month,
    /// Last billed month, `None` while still active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<Month>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last changed
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: u64,
    pub user_id: UserId,
    pub start_month: Month,
    pub end_month: Option<Month>,
}

/// Validated replacement values for an existing subscription
///
/// The owner is deliberately absent: a subscription's user never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionChanges {
    pub service_name: String,
    pub price: u64,
    pub start_month: Month,
    pub end_month: Option<Month>,
}

/// Raw create request, as typed by a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    /// `MM-YYYY`
    pub start_month: String,
    /// `MM-YYYY`; absent or empty means open-ended
    #[serde(default)]
    pub end_month: Option<String>,
}

impl SubscriptionRequest {
    /// Validate into a [`NewSubscription`]
    pub fn validate(&self) -> Result<NewSubscription> {
        let user_id = UserId::parse(self.user_id.trim())?;
        let (service_name, price, start_month, end_month) = validate_fields(
            &self.service_name,
            self.price,
            &self.start_month,
            self.end_month.as_deref(),
        )?;

        Ok(NewSubscription {
            service_name,
            price,
            user_id,
            start_month,
            end_month,
        })
    }
}

/// Raw update request, as typed by a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionChangesRequest {
    pub service_name: String,
    pub price: i64,
    /// `MM-YYYY`
    pub start_month: String,
    /// `MM-YYYY`; absent or empty means open-ended
    #[serde(default)]
    pub end_month: Option<String>,
}

impl SubscriptionChangesRequest {
    /// Validate into [`SubscriptionChanges`]
    pub fn validate(&self) -> Result<SubscriptionChanges> {
        let (service_name, price, start_month, end_month) = validate_fields(
            &self.service_name,
            self.price,
            &self.start_month,
            self.end_month.as_deref(),
        )?;

        Ok(SubscriptionChanges {
            service_name,
            price,
            start_month,
            end_month,
        })
    }
}

fn validate_fields(
    service_name: &str,
    price: i64,
    start_month: &str,
    end_month: Option<&str>,
) -> Result<(String, u64, Month, Option<Month>)> {
    let service_name = service_name.trim();
    if service_name.is_empty() {
        return Err(SubtrackError::InvalidSubscription(
            "service_name must not be empty".to_string(),
        ));
    }

    let price = u64::try_from(price)
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| {
            SubtrackError::InvalidSubscription(format!("price must be positive, got {price}"))
        })?;

    let start = Month::parse(start_month)
        .map_err(|e| SubtrackError::InvalidSubscription(format!("start_month: {e}")))?;

    let end = match end_month.filter(|s| !s.is_empty()) {
        Some(raw) => {
            let end = Month::parse(raw)
                .map_err(|e| SubtrackError::InvalidSubscription(format!("end_month: {e}")))?;
            if end < start {
                return Err(SubtrackError::InvalidSubscription(format!(
                    "end_month {end} is before start_month {start}"
                )));
            }
            Some(end)
        }
        None => None,
    };

    Ok((service_name.to_string(), price, start, end))
}

/// Largest page size a caller may request
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Validated pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    /// Create a page request; `page` starts at 1 and `limit` is 1–100
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page < 1 {
            return Err(SubtrackError::InvalidPage(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(SubtrackError::InvalidPage(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items per page
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Cut one page out of an already ordered collection
    ///
    /// Only the items on the page are consumed past the skip, so a borrowed
    /// iterator with `cloned()` copies just one page.
    pub fn paginate<I>(&self, items: I) -> Page<I::Item>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let total = items.len() as u64;
        let data = items
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        Page::new(data, *self, total)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}
