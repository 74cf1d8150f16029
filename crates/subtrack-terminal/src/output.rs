//! Output formatting module for subtrack
//!
//! This module provides formatters for displaying subscription data in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for scripts and integration with other tools
//!
//! # Examples
//!
//! ```no_run
//! use subtrack_core::month::{Month, MonthRange};
//! use subtrack_terminal::get_formatter;
//!
//! let window = MonthRange::new(
//!     Month::parse("01-2024").unwrap(),
//!     Month::parse("12-2024").unwrap(),
//! )
//! .unwrap();
//!
//! // Human-readable summary
//! println!("{}", get_formatter(false).format_total(&window, 4800));
//!
//! // Prints {"total_price": 4800}
//! println!("{}", get_formatter(true).format_total(&window, 4800));
//! ```

use colored::Colorize;
use prettytable::{Table, format, row};
use serde_json::{Value, json};
use subtrack_billing::Breakdown;
use subtrack_core::month::MonthRange;
use subtrack_core::types::{Page, Subscription, SubscriptionId};

/// Trait for output formatters
///
/// Every method returns the complete text to print, so callers stay free of
/// presentation details and commands can be tested on their output.
pub trait OutputFormatter {
    /// Format one page of a subscription listing
    fn format_subscriptions(&self, page: &Page<Subscription>) -> String;

    /// Format a single subscription record
    fn format_subscription(&self, subscription: &Subscription) -> String;

    /// Format the total spend over a window
    fn format_total(&self, window: &MonthRange, total: u64) -> String;

    /// Format a per-subscription breakdown of a total
    fn format_breakdown(&self, breakdown: &Breakdown) -> String;

    /// Confirm a deletion
    fn format_deleted(&self, id: SubscriptionId) -> String;
}

/// Table formatter for human-readable output
///
/// Amounts are whole currency units and are shown with thousands separators.
#[derive(Debug, Default)]
pub struct TableFormatter;

impl TableFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    fn format_end(subscription: &Subscription) -> String {
        subscription
            .end_month
            .map(|m| m.to_string())
            .unwrap_or_else(|| "ongoing".to_string())
    }

    fn subscription_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "ID",
            b -> "Service",
            b -> "Price",
            b -> "User",
            b -> "Start",
            b -> "End"
        ]);
        table
    }

    fn add_subscription_row(table: &mut Table, subscription: &Subscription) {
        table.add_row(row![
            r -> subscription.id,
            subscription.service_name,
            r -> Self::format_number(subscription.price),
            subscription.user_id,
            subscription.start_month,
            Self::format_end(subscription)
        ]);
    }
}

impl OutputFormatter for TableFormatter {
    fn format_subscriptions(&self, page: &Page<Subscription>) -> String {
        if page.data.is_empty() && page.total == 0 {
            return "No subscriptions stored.\n".to_string();
        }

        let mut table = Self::subscription_table();
        for subscription in &page.data {
            Self::add_subscription_row(&mut table, subscription);
        }

        let mut output = table.to_string();
        output.push_str(&format!(
            "\nPage {} of {} ({} subscriptions)\n",
            page.page,
            page.total_pages.max(1),
            page.total
        ));
        output
    }

    fn format_subscription(&self, subscription: &Subscription) -> String {
        let mut table = Self::subscription_table();
        Self::add_subscription_row(&mut table, subscription);

        let mut output = table.to_string();
        output.push_str(&format!(
            "\nCreated: {}\nUpdated: {}\n",
            subscription.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            subscription.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output
    }

    fn format_total(&self, window: &MonthRange, total: u64) -> String {
        format!(
            "Total for {} to {} ({} months): {}\n",
            window.start(),
            window.end(),
            window.month_count(),
            Self::format_number(total).bold()
        )
    }

    fn format_breakdown(&self, breakdown: &Breakdown) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "ID",
            b -> "Service",
            b -> "Price",
            b -> "Billed",
            b -> "Months",
            b -> "Amount"
        ]);

        for c in &breakdown.contributions {
            let billed = c
                .effective
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(row![
                r -> c.subscription_id,
                c.service_name,
                r -> Self::format_number(c.price),
                billed,
                r -> c.months,
                r -> Self::format_number(c.amount)
            ]);
        }

        table.add_row(row![
            b -> "TOTAL",
            "",
            "",
            "",
            "",
            br -> Self::format_number(breakdown.total)
        ]);

        let mut output = table.to_string();
        output.push_str(&format!(
            "\nWindow {}, open-ended subscriptions billed through {}\n",
            breakdown.window, breakdown.current_month
        ));
        output
    }

    fn format_deleted(&self, id: SubscriptionId) -> String {
        format!("Deleted subscription {}\n", id.to_string().bold())
    }
}

/// JSON formatter for machine-readable output
///
/// Produces pretty-printed JSON. The total is reported as
/// `{"total_price": N}`.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    fn render(value: Value) -> String {
        format!("{value:#}")
    }

    fn subscription_json(subscription: &Subscription) -> Value {
        json!(subscription)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_subscriptions(&self, page: &Page<Subscription>) -> String {
        Self::render(json!({
            "data": page.data.iter().map(Self::subscription_json).collect::<Vec<_>>(),
            "page": page.page,
            "limit": page.limit,
            "total": page.total,
            "total_pages": page.total_pages,
        }))
    }

    fn format_subscription(&self, subscription: &Subscription) -> String {
        Self::render(Self::subscription_json(subscription))
    }

    fn format_total(&self, _window: &MonthRange, total: u64) -> String {
        Self::render(json!({ "total_price": total }))
    }

    fn format_breakdown(&self, breakdown: &Breakdown) -> String {
        Self::render(json!({
            "start_month": breakdown.window.start(),
            "end_month": breakdown.window.end(),
            "current_month": breakdown.current_month,
            "subscriptions": breakdown.contributions.iter().map(|c| json!({
                "id": c.subscription_id,
                "service_name": c.service_name,
                "user_id": c.user_id,
                "price": c.price,
                "effective_start": c.effective.map(|r| r.start()),
                "effective_end": c.effective.map(|r| r.end()),
                "months": c.months,
                "amount": c.amount,
            })).collect::<Vec<_>>(),
            "total_price": breakdown.total,
        }))
    }

    fn format_deleted(&self, id: SubscriptionId) -> String {
        Self::render(json!({ "deleted": id }))
    }
}

/// Get the formatter for the requested output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
