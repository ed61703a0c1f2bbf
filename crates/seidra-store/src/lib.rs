//! Seidra Store — durable snapshot persistence.
//!
//! Two interchangeable [`SnapshotStore`](seidra_core::repository::SnapshotStore)
//! layouts live here: a single JSON ledger per record kind, and a per-record
//! directory holding `latest.json` plus an append-only `versions/` history.
//! [`SnapshotRepository`] layers the typed, in-memory, read-your-writes
//! record repository on top of either.

mod fs;
pub mod history;
pub mod layout;
pub mod ledger;
pub mod snapshot_repository;

pub use history::HistorySnapshotStore;
pub use layout::{StoreLayout, open_repository, open_store};
pub use ledger::LedgerSnapshotStore;
pub use snapshot_repository::SnapshotRepository;
