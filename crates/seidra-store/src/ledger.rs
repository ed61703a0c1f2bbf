//! Single-document ledger layout.
//!
//! One JSON file per record kind holds `{ "items": { id: snapshot } }` and is
//! rewritten wholesale on every write. No history is retained.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use seidra_core::error::DomainError;
use seidra_core::repository::SnapshotStore;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::fs;

/// Ledger-backed snapshot store.
#[derive(Debug)]
pub struct LedgerSnapshotStore {
    path: PathBuf,
    items: Mutex<BTreeMap<Uuid, Value>>,
}

impl LedgerSnapshotStore {
    /// Opens the ledger at `path`, loading it if present.
    ///
    /// Both the `{ "items": {...} }` envelope and a bare identifier map are
    /// accepted on load; writes always use the envelope.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the parent directory cannot be
    /// created or an existing ledger cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::ensure_dir(parent).await?;
        }

        let items = if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| fs::io_error("inspect", &path, &e))?
        {
            parse_ledger(&path, fs::read_json(&path).await?)
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), records = items.len(), "opened ledger store");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    async fn save(&self, items: &BTreeMap<Uuid, Value>) -> Result<(), DomainError> {
        let map: Map<String, Value> = items
            .iter()
            .map(|(id, snapshot)| (id.to_string(), snapshot.clone()))
            .collect();
        let mut document = Map::new();
        document.insert("items".to_owned(), Value::Object(map));
        fs::write_json_atomic(&self.path, &Value::Object(document)).await
    }
}

fn parse_ledger(path: &Path, document: Value) -> BTreeMap<Uuid, Value> {
    let entries = match document {
        Value::Object(mut root) => match root.remove("items") {
            Some(Value::Object(items)) => items,
            Some(_) => Map::new(),
            None => root,
        },
        _ => Map::new(),
    };

    entries
        .into_iter()
        .filter_map(|(key, snapshot)| match key.parse::<Uuid>() {
            Ok(id) => Some((id, snapshot)),
            Err(_) => {
                warn!(path = %path.display(), key, "skipping ledger entry with invalid identifier");
                None
            }
        })
        .collect()
}

#[async_trait]
impl SnapshotStore for LedgerSnapshotStore {
    async fn load_latest(&self) -> Result<Vec<(Uuid, Value)>, DomainError> {
        let items = self.items.lock().await;
        Ok(items.iter().map(|(id, v)| (*id, v.clone())).collect())
    }

    async fn append(&self, record_id: Uuid, snapshot: &Value) -> Result<(), DomainError> {
        let mut items = self.items.lock().await;
        let mut next = items.clone();
        next.insert(record_id, snapshot.clone());
        self.save(&next).await?;
        *items = next;
        Ok(())
    }

    async fn history(&self, record_id: Uuid) -> Result<Vec<Value>, DomainError> {
        let items = self.items.lock().await;
        Ok(items.get(&record_id).cloned().into_iter().collect())
    }

    async fn remove(&self, record_id: Uuid) -> Result<(), DomainError> {
        let mut items = self.items.lock().await;
        let mut next = items.clone();
        if next.remove(&record_id).is_none() {
            return Ok(());
        }
        self.save(&next).await?;
        *items = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_append_writes_items_envelope() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");
        let store = LedgerSnapshotStore::open(&path).await.unwrap();
        let id = Uuid::new_v4();

        // Act
        store.append(id, &json!({ "name": "Ilse" })).await.unwrap();

        // Assert
        let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["items"][id.to_string()]["name"], "Ilse");
    }

    #[tokio::test]
    async fn test_reopen_loads_previous_writes() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        let id = Uuid::new_v4();
        {
            let store = LedgerSnapshotStore::open(&path).await.unwrap();
            store.append(id, &json!({ "v": 1 })).await.unwrap();
            store.append(id, &json!({ "v": 2 })).await.unwrap();
        }

        // Act
        let reopened = LedgerSnapshotStore::open(&path).await.unwrap();
        let latest = reopened.load_latest().await.unwrap();

        // Assert
        assert_eq!(latest, vec![(id, json!({ "v": 2 }))]);
        assert_eq!(reopened.history(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_accepts_bare_identifier_map() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.json");
        let id = Uuid::new_v4();
        std::fs::write(
            &path,
            serde_json::to_vec(&json!({ id.to_string(): { "title": "Prologue" }, "junk": {} }))
                .unwrap(),
        )
        .unwrap();

        // Act
        let store = LedgerSnapshotStore::open(&path).await.unwrap();

        // Assert
        let latest = store.load_latest().await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].0, id);
    }

    #[tokio::test]
    async fn test_remove_drops_entry_from_document() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");
        let store = LedgerSnapshotStore::open(&path).await.unwrap();
        let keep = Uuid::new_v4();
        let gone = Uuid::new_v4();
        store.append(keep, &json!({})).await.unwrap();
        store.append(gone, &json!({})).await.unwrap();

        // Act
        store.remove(gone).await.unwrap();

        // Assert
        let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let items = on_disk["items"].as_object().unwrap();
        assert!(items.contains_key(&keep.to_string()));
        assert!(!items.contains_key(&gone.to_string()));
    }
}
