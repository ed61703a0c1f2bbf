//! Typed record repository over a [`SnapshotStore`].

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use seidra_core::clock::SharedClock;
use seidra_core::error::DomainError;
use seidra_core::record::VersionedRecord;
use seidra_core::repository::{RecordRepository, SnapshotStore};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// In-memory identifier→record map mirrored to a durable snapshot store.
///
/// The map lock is held across the durable write, so a `read` issued after a
/// `create` or `update` returns always observes it. Durable writes happen
/// before the in-memory map changes; a failed write leaves both untouched.
pub struct SnapshotRepository<R> {
    store: Arc<dyn SnapshotStore>,
    clock: SharedClock,
    records: Mutex<BTreeMap<Uuid, R>>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: VersionedRecord> std::fmt::Debug for SnapshotRepository<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRepository")
            .field("kind", &R::KIND)
            .finish_non_exhaustive()
    }
}

fn decode<R: VersionedRecord>(snapshot: serde_json::Value) -> Result<R, DomainError> {
    serde_json::from_value(snapshot).map_err(|e| {
        DomainError::Infrastructure(format!("{} snapshot deserialization failed: {e}", R::KIND))
    })
}

impl<R: VersionedRecord> SnapshotRepository<R> {
    /// Opens a repository, hydrating the in-memory map from `store`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read or a
    /// stored snapshot does not decode as `R`.
    pub async fn open(
        store: Arc<dyn SnapshotStore>,
        clock: SharedClock,
    ) -> Result<Self, DomainError> {
        let mut records = BTreeMap::new();
        for (id, snapshot) in store.load_latest().await? {
            records.insert(id, decode::<R>(snapshot)?);
        }
        info!(kind = R::KIND, records = records.len(), "opened repository");

        Ok(Self {
            store,
            clock,
            records: Mutex::new(records),
            _kind: PhantomData,
        })
    }

    async fn persist(&self, record: &R) -> Result<(), DomainError> {
        let snapshot = serde_json::to_value(record).map_err(|e| {
            DomainError::Infrastructure(format!("{} snapshot serialization failed: {e}", R::KIND))
        })?;
        self.store.append(record.id(), &snapshot).await
    }
}

#[async_trait]
impl<R: VersionedRecord> RecordRepository<R> for SnapshotRepository<R> {
    async fn create(&self, record: R) -> Result<R, DomainError> {
        let mut records = self.records.lock().await;
        let id = record.id();
        if records.contains_key(&id) {
            return Err(DomainError::Validation(format!(
                "{} {id} already exists",
                R::KIND
            )));
        }
        self.persist(&record).await?;
        records.insert(id, record.clone());
        info!(kind = R::KIND, %id, "created record");
        Ok(record)
    }

    async fn read(&self, id: Uuid) -> Result<R, DomainError> {
        self.records
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(R::KIND, id))
    }

    async fn update(&self, mut record: R) -> Result<R, DomainError> {
        let mut records = self.records.lock().await;
        let id = record.id();
        if !records.contains_key(&id) {
            return Err(DomainError::not_found(R::KIND, id));
        }
        record.touch(self.clock.now());
        self.persist(&record).await?;
        records.insert(id, record.clone());
        info!(kind = R::KIND, %id, "updated record");
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut records = self.records.lock().await;
        if !records.contains_key(&id) {
            return Err(DomainError::not_found(R::KIND, id));
        }
        self.store.remove(id).await?;
        records.remove(&id);
        info!(kind = R::KIND, %id, "deleted record");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<R>, DomainError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn history(&self, id: Uuid) -> Result<Vec<R>, DomainError> {
        let records = self.records.lock().await;
        if !records.contains_key(&id) {
            return Err(DomainError::not_found(R::KIND, id));
        }
        self.store
            .history(id)
            .await?
            .into_iter()
            .map(decode::<R>)
            .collect()
    }
}
