//! Selection of the on-disk layout for every record kind.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use seidra_core::clock::SharedClock;
use seidra_core::error::DomainError;
use seidra_core::record::VersionedRecord;
use seidra_core::repository::SnapshotStore;

use crate::history::HistorySnapshotStore;
use crate::ledger::LedgerSnapshotStore;
use crate::snapshot_repository::SnapshotRepository;

/// Durable layout used for all record stores of a service instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreLayout {
    /// `<data>/<store>.json`, rewritten on every write, no history.
    Ledger,
    /// `<data>/<store>/<id>/latest.json` plus append-only `versions/`.
    #[default]
    History,
}

impl FromStr for StoreLayout {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ledger" => Ok(Self::Ledger),
            "history" => Ok(Self::History),
            other => Err(DomainError::Validation(format!(
                "unknown store layout '{other}'; expected 'ledger' or 'history'"
            ))),
        }
    }
}

/// Opens the snapshot store named `store` under `data_dir`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store location cannot be
/// created or read.
pub async fn open_store(
    layout: StoreLayout,
    data_dir: &Path,
    store: &str,
    clock: SharedClock,
) -> Result<Arc<dyn SnapshotStore>, DomainError> {
    Ok(match layout {
        StoreLayout::Ledger => {
            Arc::new(LedgerSnapshotStore::open(data_dir.join(format!("{store}.json"))).await?)
        }
        StoreLayout::History => {
            Arc::new(HistorySnapshotStore::open(data_dir.join(store), clock).await?)
        }
    })
}

/// Opens the repository for record kind `R` under `data_dir`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store cannot be opened or its
/// snapshots do not decode.
pub async fn open_repository<R: VersionedRecord>(
    layout: StoreLayout,
    data_dir: &Path,
    clock: SharedClock,
) -> Result<SnapshotRepository<R>, DomainError> {
    let store = open_store(layout, data_dir, R::STORE, clock.clone()).await?;
    SnapshotRepository::open(store, clock).await
}
