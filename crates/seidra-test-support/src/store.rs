//! In-memory `SnapshotStore` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use seidra_core::error::DomainError;
use seidra_core::repository::SnapshotStore;
use serde_json::Value;
use uuid::Uuid;

/// A snapshot store that keeps every appended snapshot in memory, history
/// included.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<BTreeMap<Uuid, Vec<Value>>>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load_latest(&self) -> Result<Vec<(Uuid, Value)>, DomainError> {
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(id, versions)| versions.last().map(|v| (*id, v.clone())))
            .collect())
    }

    async fn append(&self, record_id: Uuid, snapshot: &Value) -> Result<(), DomainError> {
        self.snapshots
            .lock()
            .unwrap()
            .entry(record_id)
            .or_default()
            .push(snapshot.clone());
        Ok(())
    }

    async fn history(&self, record_id: Uuid) -> Result<Vec<Value>, DomainError> {
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .get(&record_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn remove(&self, record_id: Uuid) -> Result<(), DomainError> {
        self.snapshots.lock().unwrap().remove(&record_id);
        Ok(())
    }
}

/// A snapshot store that loads empty and fails every write with an
/// infrastructure error. Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingSnapshotStore;

#[async_trait]
impl SnapshotStore for FailingSnapshotStore {
    async fn load_latest(&self) -> Result<Vec<(Uuid, Value)>, DomainError> {
        Ok(vec![])
    }

    async fn append(&self, _record_id: Uuid, _snapshot: &Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk full".into()))
    }

    async fn history(&self, _record_id: Uuid) -> Result<Vec<Value>, DomainError> {
        Err(DomainError::Infrastructure("disk full".into()))
    }

    async fn remove(&self, _record_id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk full".into()))
    }
}

/// A snapshot store that loads a fixed set of snapshots and fails every
/// write with an infrastructure error.
#[derive(Debug, Default)]
pub struct ReadOnlySnapshotStore {
    snapshots: Vec<(Uuid, Value)>,
}

impl ReadOnlySnapshotStore {
    /// Create a store that loads `snapshots`.
    #[must_use]
    pub fn new(snapshots: Vec<(Uuid, Value)>) -> Self {
        Self { snapshots }
    }
}

#[async_trait]
impl SnapshotStore for ReadOnlySnapshotStore {
    async fn load_latest(&self) -> Result<Vec<(Uuid, Value)>, DomainError> {
        Ok(self.snapshots.clone())
    }

    async fn append(&self, _record_id: Uuid, _snapshot: &Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("read-only store".into()))
    }

    async fn history(&self, record_id: Uuid) -> Result<Vec<Value>, DomainError> {
        Ok(self
            .snapshots
            .iter()
            .filter(|(id, _)| *id == record_id)
            .map(|(_, snapshot)| snapshot.clone())
            .collect())
    }

    async fn remove(&self, _record_id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("read-only store".into()))
    }
}
