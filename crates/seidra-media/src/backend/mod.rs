//! Generation backends.
//!
//! A backend turns a rendered prompt and a validated config into a
//! [`MediaAsset`]. Output lands at `<base>/<kind>_<scene_identifier>.<ext>`,
//! so generating the same scene twice overwrites the earlier artifact.

pub mod local_command;
pub mod stub;

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use seidra_core::error::DomainError;
use url::Url;

use crate::config::MediaConfig;
use crate::models::{MediaAsset, MediaKind, SceneSpec};

/// A named generator for one media kind.
#[async_trait]
pub trait GenerationBackend<C: MediaConfig>: Send + Sync {
    /// Produces an asset for `scene` from an already rendered prompt.
    async fn generate(
        &self,
        scene: &SceneSpec,
        prompt: &str,
        config: &C,
    ) -> Result<MediaAsset, DomainError>;
}

/// Checks that a scene identifier can name an artifact file.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the identifier is blank or contains
/// path separators or `..`.
pub fn validate_scene_identifier(scene_identifier: &str) -> Result<(), DomainError> {
    if scene_identifier.trim().is_empty()
        || scene_identifier.contains(['/', '\\'])
        || scene_identifier.contains("..")
    {
        return Err(invalid_identifier(scene_identifier));
    }
    Ok(())
}

fn invalid_identifier(scene_identifier: &str) -> DomainError {
    DomainError::Validation(format!(
        "scene identifier '{scene_identifier}' cannot be used as a file name"
    ))
}

/// Deterministic output path for a scene.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the scene identifier is empty or
/// would escape `base` (path separators, `..`).
pub fn artifact_path(
    base: &Path,
    kind: MediaKind,
    scene_identifier: &str,
    extension: &str,
) -> Result<PathBuf, DomainError> {
    validate_scene_identifier(scene_identifier)?;
    let file_name = format!("{kind}_{scene_identifier}.{extension}");
    let mut components = Path::new(&file_name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(invalid_identifier(scene_identifier));
    }
    Ok(base.join(file_name))
}

/// `file://` URI for a local path, made absolute first. Reserved
/// characters in the path are percent-encoded.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the current directory cannot be
/// resolved or the path has no URI form.
pub fn file_uri(path: &Path) -> Result<String, DomainError> {
    let absolute = std::path::absolute(path).map_err(|e| {
        DomainError::Infrastructure(format!("failed to resolve {}: {e}", path.display()))
    })?;
    Url::from_file_path(&absolute).map(String::from).map_err(|()| {
        DomainError::Infrastructure(format!(
            "cannot express {} as a file URI",
            absolute.display()
        ))
    })
}

async fn ensure_base_dir(base: &Path) -> Result<(), DomainError> {
    tokio::fs::create_dir_all(base).await.map_err(|e| {
        DomainError::Infrastructure(format!(
            "failed to create artifact directory {}: {e}",
            base.display()
        ))
    })
}
