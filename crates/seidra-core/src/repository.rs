//! Repository abstractions for versioned records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::record::VersionedRecord;

/// Durable backing for one record kind.
///
/// Snapshots are opaque JSON documents here; typing happens one layer up in
/// the record repository.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the current snapshot of every stored record.
    async fn load_latest(&self) -> Result<Vec<(Uuid, serde_json::Value)>, DomainError>;

    /// Persists a new snapshot as the current state of `record_id`.
    async fn append(&self, record_id: Uuid, snapshot: &serde_json::Value)
    -> Result<(), DomainError>;

    /// Returns the retained snapshots of `record_id`, oldest first.
    async fn history(&self, record_id: Uuid) -> Result<Vec<serde_json::Value>, DomainError>;

    /// Removes the current and every historical snapshot of `record_id`.
    async fn remove(&self, record_id: Uuid) -> Result<(), DomainError>;
}

/// Create/read/update/delete/list contract shared by every record kind.
#[async_trait]
pub trait RecordRepository<R: VersionedRecord>: Send + Sync {
    /// Persists the first snapshot of a freshly built record.
    async fn create(&self, record: R) -> Result<R, DomainError>;

    /// Returns the current snapshot of a record.
    async fn read(&self, id: Uuid) -> Result<R, DomainError>;

    /// Stamps and persists a new snapshot of an existing record.
    async fn update(&self, record: R) -> Result<R, DomainError>;

    /// Removes a record and its history.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Returns the current snapshot of every record, ordered by identifier.
    async fn list(&self) -> Result<Vec<R>, DomainError>;

    /// Returns every retained snapshot of a record, oldest first.
    async fn history(&self, id: Uuid) -> Result<Vec<R>, DomainError>;
}
