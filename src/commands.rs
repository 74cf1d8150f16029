//! Command execution
//!
//! [`CommandContext`] runs each CLI command against a subscription store and
//! returns the rendered output, leaving printing to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use subtrack::cli::Command;
//! use subtrack::commands::CommandContext;
//! use subtrack_store::JsonFileRepository;
//!
//! # async fn example() -> subtrack::Result<()> {
//! let store = Arc::new(JsonFileRepository::new("/tmp/subscriptions.json"));
//! let context = CommandContext::new(store, false);
//!
//! let output = context
//!     .execute(&Command::List { page: 1, limit: 10 })
//!     .await?;
//! print!("{output}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use subtrack_billing::{BillingAggregator, BillingQuery, RawWindow};
use subtrack_core::clock::{Clock, SystemClock};
use subtrack_core::error::Result;
use subtrack_core::repository::{CandidateSource, SubscriptionRepository};
use subtrack_core::types::{PageRequest, SubscriptionId};
use subtrack_terminal::{OutputFormatter, get_formatter};
use tracing::info;

use crate::cli::{AddArgs, Command, TotalArgs, UpdateArgs};

/// Everything a command needs: the store, the clock and the output format
pub struct CommandContext<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    formatter: Box<dyn OutputFormatter>,
}

impl<R> CommandContext<R>
where
    R: SubscriptionRepository + 'static,
{
    /// Create a context using the system clock
    pub fn new(repository: Arc<R>, json: bool) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            formatter: get_formatter(json),
        }
    }

    /// Replace the clock used to bill open-ended subscriptions
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run one command and return its rendered output
    pub async fn execute(&self, command: &Command) -> Result<String> {
        match command {
            Command::List { page, limit } => self.list(*page, *limit).await,
            Command::Add(args) => self.add(args).await,
            Command::Get { id } => self.get(SubscriptionId::new(*id)).await,
            Command::Update(args) => self.update(args).await,
            Command::Delete { id } => self.delete(SubscriptionId::new(*id)).await,
            Command::Total(args) => self.total(args).await,
        }
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<String> {
        let request = PageRequest::new(page, limit)?;
        let page = self.repository.list(request).await?;
        Ok(self.formatter.format_subscriptions(&page))
    }

    pub async fn add(&self, args: &AddArgs) -> Result<String> {
        let new = args.to_request().validate()?;
        let created = self.repository.create(new).await?;
        Ok(self.formatter.format_subscription(&created))
    }

    pub async fn get(&self, id: SubscriptionId) -> Result<String> {
        let subscription = self.repository.get(id).await?;
        Ok(self.formatter.format_subscription(&subscription))
    }

    pub async fn update(&self, args: &UpdateArgs) -> Result<String> {
        let changes = args.to_request().validate()?;
        let updated = self
            .repository
            .update(SubscriptionId::new(args.id), changes)
            .await?;
        Ok(self.formatter.format_subscription(&updated))
    }

    pub async fn delete(&self, id: SubscriptionId) -> Result<String> {
        self.repository.delete(id).await?;
        Ok(self.formatter.format_deleted(id))
    }

    /// Total spend over a window, optionally with the per-subscription rows
    pub async fn total(&self, args: &TotalArgs) -> Result<String> {
        let mut raw = RawWindow::new(&args.start, &args.end);
        if let Some(user) = &args.user {
            raw = raw.with_user_id(user);
        }
        if let Some(service) = &args.service {
            raw = raw.with_service_name(service);
        }

        let source: Arc<dyn CandidateSource> = self.repository.clone();
        let aggregator = BillingAggregator::new(source).with_clock(self.clock.clone());

        if args.breakdown {
            let breakdown = aggregator.compute_breakdown(&raw).await?;
            info!(
                "Total over {}: {} from {} subscriptions",
                breakdown.window,
                breakdown.total,
                breakdown.contributions.len()
            );
            return Ok(self.formatter.format_breakdown(&breakdown));
        }

        let query = BillingQuery::parse(&raw)?;
        let total = aggregator.total_for(&query).await?;
        info!("Total over {}: {}", query.window, total);
        Ok(self.formatter.format_total(&query.window, total))
    }
}
