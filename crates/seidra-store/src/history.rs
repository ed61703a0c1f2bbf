//! Per-record history layout.
//!
//! ```text
//! <root>/<id>/latest.json
//! <root>/<id>/versions/000001-20260115T100000000000Z.json
//! <root>/<id>/versions/000002-20260115T100502113204Z.json
//! ```
//!
//! Each write appends a new version file and then replaces `latest.json`.
//! Version files are never rewritten or compacted. The two writes are not
//! atomic as a pair, so loading reconciles `latest.json` with the newest
//! version file that parses. Version files that do not parse are skipped.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use seidra_core::clock::SharedClock;
use seidra_core::error::DomainError;
use seidra_core::repository::SnapshotStore;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::fs;

const LATEST_FILE: &str = "latest.json";
const VERSIONS_DIR: &str = "versions";

/// History-backed snapshot store.
pub struct HistorySnapshotStore {
    root: PathBuf,
    clock: SharedClock,
}

impl std::fmt::Debug for HistorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistorySnapshotStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl HistorySnapshotStore {
    /// Opens (creating if needed) the store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the root cannot be created.
    pub async fn open(root: impl Into<PathBuf>, clock: SharedClock) -> Result<Self, DomainError> {
        let root = root.into();
        fs::ensure_dir(&root).await?;
        Ok(Self { root, clock })
    }

    fn record_dir(&self, record_id: Uuid) -> PathBuf {
        self.root.join(record_id.to_string())
    }

    /// Lists version files of a record in write order.
    async fn version_files(&self, record_id: Uuid) -> Result<Vec<PathBuf>, DomainError> {
        let dir = self.record_dir(record_id).join(VERSIONS_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(fs::io_error("list", &dir, &e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| fs::io_error("list", &dir, &e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        // Zero-padded sequence prefix makes lexical order equal write order.
        files.sort();
        Ok(files)
    }

    /// Returns the current snapshot of a record, repairing `latest.json` when
    /// it lags behind the newest version file.
    async fn resync(&self, record_id: Uuid) -> Result<Option<Value>, DomainError> {
        let latest_path = self.record_dir(record_id).join(LATEST_FILE);
        let latest = if tokio::fs::try_exists(&latest_path)
            .await
            .map_err(|e| fs::io_error("inspect", &latest_path, &e))?
        {
            Some(fs::read_json(&latest_path).await?)
        } else {
            None
        };

        let mut newest = None;
        for path in self.version_files(record_id).await?.into_iter().rev() {
            if let Some(snapshot) = fs::read_json_if_valid(&path).await? {
                newest = Some((path, snapshot));
                break;
            }
        }
        let Some((newest_path, newest)) = newest else {
            return Ok(latest);
        };

        if latest.as_ref() != Some(&newest) {
            warn!(
                %record_id,
                version = %newest_path.display(),
                "latest snapshot out of date; resynchronizing from newest version"
            );
            fs::write_json_atomic(&latest_path, &newest).await?;
        }
        Ok(Some(newest))
    }
}

fn sequence_of(path: &Path) -> Option<u64> {
    path.file_stem()?
        .to_str()?
        .split_once('-')
        .and_then(|(seq, _)| seq.parse().ok())
}

#[async_trait]
impl SnapshotStore for HistorySnapshotStore {
    async fn load_latest(&self) -> Result<Vec<(Uuid, Value)>, DomainError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| fs::io_error("list", &self.root, &e))?;

        let mut loaded = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| fs::io_error("list", &self.root, &e))?
        {
            let Some(record_id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<Uuid>().ok())
            else {
                continue;
            };
            if let Some(snapshot) = self.resync(record_id).await? {
                loaded.push((record_id, snapshot));
            }
        }
        debug!(root = %self.root.display(), records = loaded.len(), "opened history store");
        Ok(loaded)
    }

    async fn append(&self, record_id: Uuid, snapshot: &Value) -> Result<(), DomainError> {
        let record_dir = self.record_dir(record_id);
        let versions_dir = record_dir.join(VERSIONS_DIR);
        fs::ensure_dir(&versions_dir).await?;

        let sequence = self
            .version_files(record_id)
            .await?
            .last()
            .and_then(|p| sequence_of(p))
            .unwrap_or(0)
            + 1;
        let stamp = self.clock.now().format("%Y%m%dT%H%M%S%6fZ");
        let version_path = versions_dir.join(format!("{sequence:06}-{stamp}.json"));

        fs::write_json_new(&version_path, snapshot).await?;
        fs::write_json_atomic(&record_dir.join(LATEST_FILE), snapshot).await?;
        debug!(%record_id, sequence, "appended snapshot version");
        Ok(())
    }

    async fn history(&self, record_id: Uuid) -> Result<Vec<Value>, DomainError> {
        let mut snapshots = Vec::new();
        for path in self.version_files(record_id).await? {
            snapshots.extend(fs::read_json_if_valid(&path).await?);
        }
        Ok(snapshots)
    }

    async fn remove(&self, record_id: Uuid) -> Result<(), DomainError> {
        let dir = self.record_dir(record_id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(fs::io_error("remove", &dir, &e)),
        }
    }
}
