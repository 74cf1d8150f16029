//! JSON file subscription store
//!
//! Persists every subscription in a single JSON document. A missing file is
//! an empty store. Each write loads the current document, applies the change,
//! writes a uniquely named sibling temporary file and renames it over the
//! original, so a failed write never leaves a half-written document behind.
//! Writers inside one process are serialised by a mutex; readers see either
//! the old or the new document.
//!
//! Separate processes sharing one file are not serialised against each other.
//! Their writes never corrupt the document, but the last rename wins and an
//! overlapping change made by another process can be lost.
//!
//! # Examples
//!
//! ```no_run
//! use subtrack_core::repository::SubscriptionRepository;
//! use subtrack_core::types::PageRequest;
//! use subtrack_store::JsonFileRepository;
//!
//! # async fn example() -> subtrack_core::Result<()> {
//! let store = JsonFileRepository::new("/tmp/subscriptions.json");
//! let page = store.list(PageRequest::default()).await?;
//! println!("{} subscriptions stored", page.total);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use subtrack_core::error::{Result, StorageError};
use subtrack_core::repository::{CandidateFilter, CandidateSource, SubscriptionRepository};
use subtrack_core::types::{
    NewSubscription, Page, PageRequest, Subscription, SubscriptionChanges, SubscriptionId,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::snapshot::StoreSnapshot;

/// Subscription store persisted as one JSON file
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Open a store at `path`; nothing is read until the first operation
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> std::result::Result<StoreSnapshot, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let snapshot = StoreSnapshot::from_json(&bytes).inspect_err(|e| {
                    warn!("Store at {} could not be loaded: {}", self.path.display(), e)
                })?;
                debug!(
                    "Loaded {} subscriptions from {}",
                    snapshot.len(),
                    self.path.display()
                );
                Ok(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", self.path.display());
                Ok(StoreSnapshot::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> std::result::Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = snapshot.to_json()?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(
            "Wrote {} subscriptions to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }

    /// Load, apply `change`, and persist only if the change succeeded
    async fn modify<T: Send>(
        &self,
        change: impl FnOnce(&mut StoreSnapshot) -> Result<T> + Send,
    ) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.load().await?;
        let value = change(&mut snapshot)?;
        self.save(&snapshot).await?;
        Ok(value)
    }
}

#[async_trait]
impl CandidateSource for JsonFileRepository {
    async fn fetch_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> std::result::Result<Vec<Subscription>, StorageError> {
        let snapshot = self.load().await?;
        Ok(snapshot.candidates(filter))
    }
}

#[async_trait]
impl SubscriptionRepository for JsonFileRepository {
    async fn create(&self, new: NewSubscription) -> Result<Subscription> {
        let created = self
            .modify(|snapshot| snapshot.insert(new, Utc::now()))
            .await?;
        info!("Created subscription {} ({})", created.id, created.service_name);
        Ok(created)
    }

    async fn get(&self, id: SubscriptionId) -> Result<Subscription> {
        self.load().await?.get(id)
    }

    async fn update(
        &self,
        id: SubscriptionId,
        changes: SubscriptionChanges,
    ) -> Result<Subscription> {
        let updated = self
            .modify(|snapshot| snapshot.update(id, changes, Utc::now()))
            .await?;
        info!("Updated subscription {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: SubscriptionId) -> Result<()> {
        self.modify(|snapshot| snapshot.remove(id)).await?;
        info!("Deleted subscription {}", id);
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Subscription>> {
        Ok(self.load().await?.page(page))
    }
}
