//! In-memory state shared by every store
//!
//! Both stores keep their rows in a [`StoreSnapshot`]: the memory store holds
//! one behind a lock, the file store loads one, applies a change, and writes
//! it back. Keeping the mutation logic here means id assignment, timestamps
//! and ordering behave identically across backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use subtrack_core::error::{Result, StorageError, SubtrackError};
use subtrack_core::repository::CandidateFilter;
use subtrack_core::types::{
    NewSubscription, Page, PageRequest, Subscription, SubscriptionChanges, SubscriptionId,
};

/// All rows of a store plus the next id to hand out
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    next_id: u64,
    rows: BTreeMap<SubscriptionId, Subscription>,
}

/// On-disk layout of a snapshot
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl StoreSnapshot {
    /// Build a snapshot from existing rows
    ///
    /// The next id continues after the highest id present. Fails when that
    /// id is already `u64::MAX`.
    pub fn from_rows(
        rows: impl IntoIterator<Item = Subscription>,
    ) -> std::result::Result<Self, StorageError> {
        let rows: BTreeMap<_, _> = rows.into_iter().map(|s| (s.id, s)).collect();
        let next_id = match rows.keys().next_back() {
            Some(id) => id.get().checked_add(1).ok_or_else(|| {
                StorageError::Backend(format!("subscription id {id} leaves no id to assign"))
            })?,
            None => 1,
        };
        Ok(Self { next_id, rows })
    }

    /// Decode a stored document
    pub fn from_json(bytes: &[u8]) -> std::result::Result<Self, StorageError> {
        let document: SnapshotDocument = serde_json::from_slice(bytes)?;
        let mut snapshot = Self::from_rows(document.subscriptions)?;
        // Never reuse ids of deleted rows
        snapshot.next_id = snapshot.next_id.max(document.next_id);
        Ok(snapshot)
    }

    /// Encode for storage
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let document = SnapshotDocument {
            next_id: self.next_id,
            subscriptions: self.rows.values().cloned().collect(),
        };
        serde_json::to_vec_pretty(&document)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn insert(&mut self, new: NewSubscription, now: DateTime<Utc>) -> Result<Subscription> {
        let id = SubscriptionId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StorageError::Backend("subscription ids exhausted".to_string()))?;

        let subscription = Subscription {
            id,
            service_name: new.service_name,
            price: new.price,
            user_id: new.user_id,
            start_month: new.start_month,
            end_month: new.end_month,
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(id, subscription.clone());
        Ok(subscription)
    }

    pub fn get(&self, id: SubscriptionId) -> Result<Subscription> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or(SubtrackError::NotFound(id))
    }

    pub fn update(
        &mut self,
        id: SubscriptionId,
        changes: SubscriptionChanges,
        now: DateTime<Utc>,
    ) -> Result<Subscription> {
        let existing = self.rows.get_mut(&id).ok_or(SubtrackError::NotFound(id))?;
        existing.service_name = changes.service_name;
        existing.price = changes.price;
        existing.start_month = changes.start_month;
        existing.end_month = changes.end_month;
        existing.updated_at = now;
        Ok(existing.clone())
    }

    pub fn remove(&mut self, id: SubscriptionId) -> Result<()> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or(SubtrackError::NotFound(id))
    }

    pub fn page(&self, request: PageRequest) -> Page<Subscription> {
        request.paginate(self.rows.values().cloned())
    }

    pub fn candidates(&self, filter: &CandidateFilter) -> Vec<Subscription> {
        self.rows
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtrack_core::month::Month;
    use subtrack_core::types::UserId;

    fn new_sub(service: &str, start: &str) -> NewSubscription {
        NewSubscription {
            service_name: service.to_string(),
            price: 100,
            user_id: UserId::parse("60601fee-2bf1-4721-ae6f-7636e79a0cba").unwrap(),
            start_month: Month::parse(start).unwrap(),
            end_month: None,
        }
    }

    #[test]
    fn test_ids_are_sequential_and_not_reused() {
        let mut snapshot = StoreSnapshot::default();
        let a = snapshot.insert(new_sub("A", "01-2024"), Utc::now()).unwrap();
        let b = snapshot.insert(new_sub("B", "01-2024"), Utc::now()).unwrap();
        assert_eq!((a.id.get(), b.id.get()), (1, 2));

        snapshot.remove(b.id).unwrap();
        let c = snapshot.insert(new_sub("C", "01-2024"), Utc::now()).unwrap();
        assert_eq!(c.id.get(), 3);
    }

    #[test]
    fn test_json_round_trip_keeps_next_id() {
        let mut snapshot = StoreSnapshot::default();
        snapshot.insert(new_sub("A", "01-2024"), Utc::now()).unwrap();
        let b = snapshot.insert(new_sub("B", "02-2024"), Utc::now()).unwrap();
        snapshot.remove(b.id).unwrap();

        let restored = StoreSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 1);
        let mut restored = restored;
        let next = restored.insert(new_sub("C", "03-2024"), Utc::now()).unwrap();
        assert_eq!(next.id.get(), 3);
    }

    #[test]
    fn test_row_at_max_id_is_rejected() {
        let document = br#"{
            "next_id": 1,
            "subscriptions": [{
                "id": 18446744073709551615,
                "service_name": "Netflix",
                "price": 100,
                "user_id": "60601fee-2bf1-4721-ae6f-7636e79a0cba",
                "start_month": "01-2024",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let err = StoreSnapshot::from_json(document).unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }

    #[test]
    fn test_exhausted_ids_fail_insert() {
        let document = format!(r#"{{"next_id": {}, "subscriptions": []}}"#, u64::MAX);
        let mut snapshot = StoreSnapshot::from_json(document.as_bytes()).unwrap();

        let err = snapshot
            .insert(new_sub("A", "01-2024"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SubtrackError::Storage(StorageError::Backend(_))));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_missing_rows_are_not_found() {
        let mut snapshot = StoreSnapshot::default();
        let id = SubscriptionId::new(9);
        assert!(matches!(snapshot.get(id), Err(SubtrackError::NotFound(_))));
        assert!(matches!(snapshot.remove(id), Err(SubtrackError::NotFound(_))));
    }
}
