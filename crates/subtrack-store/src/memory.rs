//! In-memory subscription store
//!
//! Keeps all rows in process memory. Used by tests, benchmarks, and anyone
//! embedding the aggregator over data they already hold.

use async_trait::async_trait;
use chrono::Utc;
use subtrack_core::error::{Result, StorageError};
use subtrack_core::repository::{CandidateFilter, CandidateSource, SubscriptionRepository};
use subtrack_core::types::{
    NewSubscription, Page, PageRequest, Subscription, SubscriptionChanges, SubscriptionId,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::snapshot::StoreSnapshot;

/// Subscription store backed by a locked in-memory snapshot
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<StoreSnapshot>,
}

impl MemoryRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with existing rows
    pub fn with_subscriptions(
        rows: impl IntoIterator<Item = Subscription>,
    ) -> std::result::Result<Self, StorageError> {
        Ok(Self {
            state: RwLock::new(StoreSnapshot::from_rows(rows)?),
        })
    }
}

#[async_trait]
impl CandidateSource for MemoryRepository {
    async fn fetch_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> std::result::Result<Vec<Subscription>, StorageError> {
        let state = self.state.read().await;
        let candidates = state.candidates(filter);
        debug!(
            "Memory store returned {} of {} rows as candidates",
            candidates.len(),
            state.len()
        );
        Ok(candidates)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryRepository {
    async fn create(&self, new: NewSubscription) -> Result<Subscription> {
        let created = self.state.write().await.insert(new, Utc::now())?;
        info!("Created subscription {} ({})", created.id, created.service_name);
        Ok(created)
    }

    async fn get(&self, id: SubscriptionId) -> Result<Subscription> {
        self.state.read().await.get(id)
    }

    async fn update(
        &self,
        id: SubscriptionId,
        changes: SubscriptionChanges,
    ) -> Result<Subscription> {
        let updated = self.state.write().await.update(id, changes, Utc::now())?;
        info!("Updated subscription {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: SubscriptionId) -> Result<()> {
        self.state.write().await.remove(id)?;
        info!("Deleted subscription {}", id);
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Subscription>> {
        Ok(self.state.read().await.page(page))
    }
}
