//! Small async filesystem helpers shared by the store layouts.

use std::path::Path;

use seidra_core::error::DomainError;
use tracing::warn;

pub(crate) fn io_error(action: &str, path: &Path, err: &std::io::Error) -> DomainError {
    DomainError::Infrastructure(format!("failed to {action} {}: {err}", path.display()))
}

pub(crate) async fn read_json(path: &Path) -> Result<serde_json::Value, DomainError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| io_error("read", path, &e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        DomainError::Infrastructure(format!("malformed snapshot {}: {e}", path.display()))
    })
}

/// Reads a version document, returning `None` (with a warning) when it does
/// not parse, as happens with a file torn by a crash.
pub(crate) async fn read_json_if_valid(
    path: &Path,
) -> Result<Option<serde_json::Value>, DomainError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| io_error("read", path, &e))?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping malformed snapshot");
            Ok(None)
        }
    }
}

fn encode(value: &serde_json::Value) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| DomainError::Infrastructure(format!("snapshot serialization failed: {e}")))
}

/// Replaces `path` with `value` through a sibling temp file and a rename, so
/// readers never observe a half-written document.
pub(crate) async fn write_json_atomic(
    path: &Path,
    value: &serde_json::Value,
) -> Result<(), DomainError> {
    let bytes = encode(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| io_error("write", &tmp, &e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error("replace", path, &e))
}

/// Writes a new document through a temp file and a rename, failing if
/// `path` already exists.
///
/// Callers serialize writers per record, so the existence check and the
/// rename do not race.
pub(crate) async fn write_json_new(
    path: &Path,
    value: &serde_json::Value,
) -> Result<(), DomainError> {
    if tokio::fs::try_exists(path)
        .await
        .map_err(|e| io_error("inspect", path, &e))?
    {
        return Err(DomainError::Infrastructure(format!(
            "refusing to overwrite {}",
            path.display()
        )));
    }
    write_json_atomic(path, value).await
}

pub(crate) async fn ensure_dir(path: &Path) -> Result<(), DomainError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| io_error("create directory", path, &e))
}
