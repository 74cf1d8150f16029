//! Resolution of the current month
//!
//! Open-ended subscriptions are billed up to "now", read at the moment of
//! aggregation. The clock is injected so that tests and embedders can pin it.

use chrono::Utc;
use tracing::debug;

use crate::month::Month;

/// Source of the current month
pub trait Clock: Send + Sync {
    fn current_month(&self) -> Month;
}

/// Reads the system time in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_month(&self) -> Month {
        let month = Month::from_date(&Utc::now());
        debug!("Resolved current month: {}", month);
        month
    }
}

/// Always reports the same month
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Month);

impl Clock for FixedClock {
    fn current_month(&self) -> Month {
        self.0
    }
}
