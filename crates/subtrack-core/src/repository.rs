//! Repository traits for subscription storage
//!
//! The billing aggregator only needs [`CandidateSource`]: a way to fetch the
//! rows that could overlap a query window. Management front-ends use the
//! wider [`SubscriptionRepository`]. Store crates implement both.
//!
//! # Example
//!
//! ```
//! use subtrack_core::month::Month;
//! use subtrack_core::repository::CandidateFilter;
//!
//! let filter = CandidateFilter::new(
//!     Month::new(2024, 1).unwrap(),
//!     Month::new(2024, 12).unwrap(),
//! )
//! .with_service_name("Netflix");
//! assert_eq!(filter.service_name.as_deref(), Some("Netflix"));
//! ```

use async_trait::async_trait;

use crate::error::{Result, StorageError};
use crate::month::Month;
use crate::types::{
    NewSubscription, Page, PageRequest, Subscription, SubscriptionChanges, SubscriptionId, UserId,
};

/// Coarse selection handed to storage
///
/// A subscription is a candidate when it starts no later than the window end,
/// has not ended before the window start, and matches the optional user and
/// service filters. Service names compare exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFilter {
    pub window_start: Month,
    pub window_end: Month,
    pub user_id: Option<UserId>,
    pub service_name: Option<String>,
}

impl CandidateFilter {
    /// Filter on the window only
    pub fn new(window_start: Month, window_end: Month) -> Self {
        Self {
            window_start,
            window_end,
            user_id: None,
            service_name: None,
        }
    }

    /// Restrict to one user
    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restrict to one service name
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Evaluate the coarse predicate against a stored row
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if subscription.start_month > self.window_end {
            return false;
        }

        if let Some(end) = subscription.end_month {
            if end < self.window_start {
                return false;
            }
        }

        if let Some(user_id) = &self.user_id {
            if &subscription.user_id != user_id {
                return false;
            }
        }

        if let Some(service_name) = &self.service_name {
            if &subscription.service_name != service_name {
                return false;
            }
        }

        true
    }
}

/// Supplies aggregation candidates
///
/// Implementations must return every subscription satisfying
/// [`CandidateFilter::matches`]. Returning extra rows is allowed.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> std::result::Result<Vec<Subscription>, StorageError>;
}

/// Full subscription storage
#[async_trait]
pub trait SubscriptionRepository: CandidateSource {
    /// Persist a new subscription and return it with its id and timestamps
    async fn create(&self, new: NewSubscription) -> Result<Subscription>;

    /// Fetch one subscription
    async fn get(&self, id: SubscriptionId) -> Result<Subscription>;

    /// Replace the mutable fields of a subscription
    async fn update(&self, id: SubscriptionId, changes: SubscriptionChanges)
    -> Result<Subscription>;

    /// Remove a subscription
    async fn delete(&self, id: SubscriptionId) -> Result<()>;

    /// List subscriptions ordered by id
    async fn list(&self, page: PageRequest) -> Result<Page<Subscription>>;
}
