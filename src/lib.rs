//! subtrack - Track recurring subscriptions and total their spend
//!
//! This library provides functionality to:
//! - Store subscriptions (service, monthly price, user, billed months)
//! - Total what they cost over an inclusive month window, optionally
//!   filtered by user and service
//! - Break a total down per subscription
//! - Render results as tables or JSON
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use subtrack::{
//!     billing::{BillingAggregator, RawWindow},
//!     repository::SubscriptionRepository,
//!     store::JsonFileRepository,
//!     types::SubscriptionRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> subtrack::Result<()> {
//!     let store = Arc::new(JsonFileRepository::new("/tmp/subscriptions.json"));
//!
//!     let request = SubscriptionRequest {
//!         service_name: "Yandex Plus".to_string(),
//!         price: 400,
//!         user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
//!         start_month: "07-2025".to_string(),
//!         end_month: None,
//!     };
//!     store.create(request.validate()?).await?;
//!
//!     let aggregator = BillingAggregator::new(store);
//!     let total = aggregator
//!         .compute_total(&RawWindow::new("01-2025", "12-2025"))
//!         .await?;
//!     println!("total_price: {total}");
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;

pub use subtrack_billing as billing;
pub use subtrack_core::{clock, error, month, repository, types};
pub use subtrack_store as store;
pub use subtrack_terminal::output;

// Re-export commonly used types
pub use error::{Result, SubtrackError};
pub use month::{Month, MonthRange};
pub use types::{Subscription, SubscriptionId, UserId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
