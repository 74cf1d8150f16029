//! CLI interface for subtrack
//!
//! This module defines the command-line interface using clap. Every command
//! works on one subscription store, chosen with `--data-file` or the
//! `SUBTRACK_DATA_FILE` environment variable.
//!
//! # Example
//!
//! ```bash
//! # Record a subscription that started in July 2025 and is still running
//! subtrack add --service "Yandex Plus" --price 400 \
//!     --user 60601fee-2bf1-4721-ae6f-7636e79a0cba --start 07-2025
//!
//! # What did this user spend on it during 2025?
//! subtrack total --start 01-2025 --end 12-2025 \
//!     --user 60601fee-2bf1-4721-ae6f-7636e79a0cba --service "Yandex Plus"
//!
//! # Same total as JSON, with one row per subscription
//! subtrack --json total --start 01-2025 --end 12-2025 --breakdown
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use subtrack_core::types::{SubscriptionChangesRequest, SubscriptionRequest};

/// Track recurring subscriptions and total their spend
#[derive(Parser, Debug, Clone)]
#[command(name = "subtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subscription store to use (defaults to the user data directory)
    #[arg(long, env = "SUBTRACK_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log warnings and errors (overrides RUST_LOG)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List stored subscriptions, ordered by id
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Subscriptions per page (at most 100)
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Record a new subscription
    Add(AddArgs),

    /// Show one subscription
    Get {
        /// Subscription id
        id: u64,
    },

    /// Replace a subscription's service, price and billing months
    Update(UpdateArgs),

    /// Delete a subscription
    Delete {
        /// Subscription id
        id: u64,
    },

    /// Total spend over an inclusive month window
    Total(TotalArgs),
}

/// Arguments for `add`
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Service name, matched exactly by `total --service`
    #[arg(long)]
    pub service: String,

    /// Monthly price in whole currency units
    #[arg(long, allow_negative_numbers = true)]
    pub price: i64,

    /// Owning user (UUID)
    #[arg(long)]
    pub user: String,

    /// First billed month (MM-YYYY)
    #[arg(long)]
    pub start: String,

    /// Last billed month (MM-YYYY); omit for an ongoing subscription
    #[arg(long)]
    pub end: Option<String>,
}

impl AddArgs {
    /// Unvalidated request built from the arguments
    pub fn to_request(&self) -> SubscriptionRequest {
        SubscriptionRequest {
            service_name: self.service.clone(),
            price: self.price,
            user_id: self.user.clone(),
            start_month: self.start.clone(),
            end_month: self.end.clone(),
        }
    }
}

/// Arguments for `update`
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Subscription id
    pub id: u64,

    /// Service name
    #[arg(long)]
    pub service: String,

    /// Monthly price in whole currency units
    #[arg(long, allow_negative_numbers = true)]
    pub price: i64,

    /// First billed month (MM-YYYY)
    #[arg(long)]
    pub start: String,

    /// Last billed month (MM-YYYY); omit to make the subscription ongoing
    #[arg(long)]
    pub end: Option<String>,
}

impl UpdateArgs {
    pub fn to_request(&self) -> SubscriptionChangesRequest {
        SubscriptionChangesRequest {
            service_name: self.service.clone(),
            price: self.price,
            start_month: self.start.clone(),
            end_month: self.end.clone(),
        }
    }
}

/// Arguments for `total`
#[derive(Args, Debug, Clone)]
pub struct TotalArgs {
    /// First month of the window (MM-YYYY)
    #[arg(long)]
    pub start: String,

    /// Last month of the window (MM-YYYY), inclusive
    #[arg(long)]
    pub end: String,

    /// Only count subscriptions of this user (UUID)
    #[arg(long)]
    pub user: Option<String>,

    /// Only count subscriptions with exactly this service name
    #[arg(long)]
    pub service: Option<String>,

    /// Show each subscription's contribution
    #[arg(long)]
    pub breakdown: bool,
}
