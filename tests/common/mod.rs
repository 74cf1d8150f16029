//! Common test utilities and helpers for subtrack tests
//!
//! This module provides reusable builders, fixed clocks and temporary stores
//! shared by the integration tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use std::env;
use std::sync::Arc;
use subtrack::clock::{Clock, FixedClock};
use subtrack::month::Month;
use subtrack::store::{JsonFileRepository, MemoryRepository};
use subtrack::types::{Subscription, SubscriptionId, UserId};
use tempfile::TempDir;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Users appearing across tests
pub const USER_A: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
pub const USER_B: &str = "2f1c3b7e-8d4a-4e6f-9b0c-1a2b3c4d5e6f";

/// Parse a month literal, panicking on typos in test data
pub fn month(s: &str) -> Month {
    Month::parse(s).expect("valid test month")
}

/// Clock pinned to `s`
pub fn clock_at(s: &str) -> Arc<dyn Clock> {
    Arc::new(FixedClock(month(s)))
}

/// Builder for creating test Subscription instances
pub struct SubscriptionBuilder {
    id: u64,
    service_name: String,
    price: u64,
    user_id: String,
    start_month: String,
    end_month: Option<String>,
}

impl SubscriptionBuilder {
    /// Create a new builder with default values
    pub fn new(id: u64) -> Self {
        Self {
            id,
            service_name: "Netflix".to_string(),
            price: 100,
            user_id: USER_A.to_string(),
            start_month: "01-2024".to_string(),
            end_month: None,
        }
    }

    pub fn service(mut self, service: &str) -> Self {
        self.service_name = service.to_string();
        self
    }

    pub fn price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    pub fn user(mut self, user: &str) -> Self {
        self.user_id = user.to_string();
        self
    }

    pub fn start(mut self, start: &str) -> Self {
        self.start_month = start.to_string();
        self
    }

    pub fn end(mut self, end: &str) -> Self {
        self.end_month = Some(end.to_string());
        self
    }

    pub fn build(self) -> Subscription {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Subscription {
            id: SubscriptionId::new(self.id),
            service_name: self.service_name,
            price: self.price,
            user_id: UserId::parse(&self.user_id).expect("valid test user"),
            start_month: month(&self.start_month),
            end_month: self.end_month.as_deref().map(month),
            created_at: at,
            updated_at: at,
        }
    }
}

/// In-memory store holding `rows`
pub fn memory_store(rows: Vec<Subscription>) -> Arc<MemoryRepository> {
    Arc::new(MemoryRepository::with_subscriptions(rows).expect("seed rows"))
}

/// JSON file store inside a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (TempDir, Arc<JsonFileRepository>) {
    let dir = TempDir::new().expect("create temp dir");
    let store = Arc::new(JsonFileRepository::new(dir.path().join("subscriptions.json")));
    (dir, store)
}

/// RAII guard for environment variable manipulation in tests
///
/// Restores the original values on drop, even if the test panics. Hold
/// [`ENV_MUTEX`] while the guard is alive.
pub struct EnvVarGuard {
    vars: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set an environment variable and remember its original value
    pub fn set(&mut self, key: &str, value: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        // Note: env::set_var is unsafe in Rust 1.82+ due to thread-safety concerns
        unsafe {
            env::set_var(key, value);
        }
    }

    /// Remove an environment variable and remember its original value
    pub fn remove(&mut self, key: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        unsafe {
            env::remove_var(key);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.vars.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
