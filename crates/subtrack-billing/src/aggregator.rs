//! Billing aggregator
//!
//! Computes what a set of subscriptions costs over a month window. Work is
//! split in two stages: storage narrows the rows with the coarse overlap
//! predicate, then every returned row is clipped to the window here, with
//! open-ended subscriptions running until the current month. Because each row
//! is re-clipped, a store that returns extra rows cannot inflate the total.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use subtrack_billing::{BillingAggregator, RawWindow};
//! use subtrack_core::repository::CandidateSource;
//!
//! # async fn example(store: Arc<dyn CandidateSource>) -> subtrack_core::Result<()> {
//! let aggregator = BillingAggregator::new(store);
//!
//! let window = RawWindow::new("01-2024", "12-2024").with_service_name("Netflix");
//! let total = aggregator.compute_total(&window).await?;
//! println!("Spent {total} in 2024");
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::sync::Arc;
use subtrack_core::clock::{Clock, SystemClock};
use subtrack_core::error::Result;
use subtrack_core::month::{Month, MonthRange};
use subtrack_core::repository::CandidateSource;
use subtrack_core::types::{Subscription, SubscriptionId, UserId};
use tracing::debug;

use crate::query::{BillingQuery, RawWindow};

/// One subscription's share of a total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub subscription_id: SubscriptionId,
    pub service_name: String,
    pub user_id: UserId,
    pub price: u64,
    /// Billed months inside the window, `None` when there is no overlap
    pub effective: Option<MonthRange>,
    pub months: u32,
    pub amount: u64,
}

/// Per-subscription view of an aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub window: MonthRange,
    /// Month used as the end of open-ended subscriptions
    pub current_month: Month,
    pub contributions: Vec<Contribution>,
    pub total: u64,
}

/// Clip a subscription's active interval to the window
///
/// The subscription is active from its start month through its end month,
/// or through `now` when it has no end. Returns `None` when nothing of that
/// interval falls in the window.
pub fn clip_subscription(
    subscription: &Subscription,
    window: &MonthRange,
    now: Month,
) -> Option<MonthRange> {
    let active_end = subscription.end_month.unwrap_or(now);
    window.clip(subscription.start_month, active_end)
}

/// Amount a subscription contributes to the window total
pub fn contribution(subscription: &Subscription, window: &MonthRange, now: Month) -> u64 {
    clip_subscription(subscription, window, now)
        .map(|effective| u64::from(effective.month_count()).saturating_mul(subscription.price))
        .unwrap_or(0)
}

/// Sum the contributions of `subscriptions`
pub fn total_cost(subscriptions: &[Subscription], window: &MonthRange, now: Month) -> u64 {
    subscriptions
        .iter()
        .map(|s| contribution(s, window, now))
        .fold(0u64, u64::saturating_add)
}

/// Computes subscription spend over month windows
///
/// Holds an injected candidate source and clock; it keeps no other state and
/// can be shared across concurrent requests.
pub struct BillingAggregator {
    source: Arc<dyn CandidateSource>,
    clock: Arc<dyn Clock>,
}

impl BillingAggregator {
    /// Create an aggregator that reads the current month from the system clock
    pub fn new(source: Arc<dyn CandidateSource>) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to resolve "now"
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Total spend for a raw window
    ///
    /// # Errors
    ///
    /// Validation errors (see [`BillingQuery::parse`]) are returned before
    /// storage is touched. Storage failures are passed through unchanged.
    pub async fn compute_total(&self, raw: &RawWindow) -> Result<u64> {
        let query = BillingQuery::parse(raw)?;
        self.total_for(&query).await
    }

    /// Total spend for an already validated query
    pub async fn total_for(&self, query: &BillingQuery) -> Result<u64> {
        let candidates = self.fetch(query).await?;
        let now = self.clock.current_month();
        let total = total_cost(&candidates, &query.window, now);

        debug!(
            "Aggregated {} candidates over {}: total {}",
            candidates.len(),
            query.window,
            total
        );
        Ok(total)
    }

    /// Per-subscription breakdown for a raw window
    ///
    /// Rows are ordered by subscription id; the breakdown's total equals
    /// [`compute_total`](Self::compute_total) for the same input.
    pub async fn compute_breakdown(&self, raw: &RawWindow) -> Result<Breakdown> {
        let query = BillingQuery::parse(raw)?;
        let mut candidates = self.fetch(&query).await?;
        candidates.sort_by_key(|s| s.id);

        let now = self.clock.current_month();
        let contributions: Vec<Contribution> = candidates
            .into_iter()
            .map(|subscription| {
                let effective = clip_subscription(&subscription, &query.window, now);
                let months = effective.map(|r| r.month_count()).unwrap_or(0);
                Contribution {
                    amount: u64::from(months).saturating_mul(subscription.price),
                    subscription_id: subscription.id,
                    service_name: subscription.service_name,
                    user_id: subscription.user_id,
                    price: subscription.price,
                    effective,
                    months,
                }
            })
            .collect();
        let total = contributions
            .iter()
            .map(|c| c.amount)
            .fold(0u64, u64::saturating_add);

        Ok(Breakdown {
            window: query.window,
            current_month: now,
            contributions,
            total,
        })
    }

    async fn fetch(&self, query: &BillingQuery) -> Result<Vec<Subscription>> {
        let filter = query.candidate_filter();
        let candidates = self.source.fetch_candidates(&filter).await?;

        for candidate in &candidates {
            debug!(
                "Candidate {} ({}): {}..{} at {}",
                candidate.id,
                candidate.service_name,
                candidate.start_month,
                candidate
                    .end_month
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "open".to_string()),
                candidate.price
            );
        }
        Ok(candidates)
    }
}
