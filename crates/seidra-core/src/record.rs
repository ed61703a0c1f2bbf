//! Versioned record abstraction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Schema version written into every new record.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A domain record persisted as a sequence of immutable snapshots.
///
/// Every write of a record produces a complete new snapshot; nothing is
/// mutated in place on disk.
pub trait VersionedRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular record kind, used in errors and logs (e.g. `character`).
    const KIND: &'static str;

    /// Name of the durable store holding this kind (e.g. `characters`).
    const STORE: &'static str;

    /// Returns the record identifier.
    fn id(&self) -> Uuid;

    /// Refreshes the modified timestamp before an update is persisted.
    ///
    /// Records without a modified timestamp keep the default no-op.
    fn touch(&mut self, _now: DateTime<Utc>) {}
}
