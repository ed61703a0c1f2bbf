//! Shared test doubles for the Seidra workspace.

mod backend;
mod clock;
mod store;

pub use backend::{FailingBackend, RecordingBackend};
pub use clock::{FixedClock, SteppingClock};
pub use store::{FailingSnapshotStore, MemorySnapshotStore, ReadOnlySnapshotStore};
