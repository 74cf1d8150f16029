//! Shared test utilities for unit tests
//!
//! Integration tests (in tests/) cannot access this module because it's
//! marked with #[cfg(test)]. They have their own builder in
//! tests/common/mod.rs.

use chrono::{TimeZone, Utc};

use crate::month::Month;
use crate::types::{Subscription, SubscriptionId, UserId};

/// Parse a month literal
pub fn month(s: &str) -> Month {
    Month::parse(s).unwrap()
}

/// Builder for test subscriptions with sensible defaults
pub struct SubscriptionBuilder {
    subscription: Subscription,
}

impl SubscriptionBuilder {
    pub fn new() -> Self {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Self {
            subscription: Subscription {
                id: SubscriptionId::new(1),
                service_name: "Netflix".to_string(),
                price: 100,
                user_id: UserId::parse("60601fee-2bf1-4721-ae6f-7636e79a0cba").unwrap(),
                start_month: month("01-2024"),
                end_month: None,
                created_at: created,
                updated_at: created,
            },
        }
    }

    #[allow(dead_code)]
    pub fn id(mut self, id: u64) -> Self {
        self.subscription.id = SubscriptionId::new(id);
        self
    }

    pub fn service(mut self, name: &str) -> Self {
        self.subscription.service_name = name.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn price(mut self, price: u64) -> Self {
        self.subscription.price = price;
        self
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.subscription.user_id = user_id;
        self
    }

    pub fn start(mut self, s: &str) -> Self {
        self.subscription.start_month = month(s);
        self
    }

    pub fn end(mut self, s: &str) -> Self {
        self.subscription.end_month = Some(month(s));
        self
    }

    pub fn build(self) -> Subscription {
        self.subscription
    }
}

impl Default for SubscriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
