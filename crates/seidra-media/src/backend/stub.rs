//! Placeholder backend that writes a text description instead of media.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use seidra_core::error::DomainError;
use serde_json::json;
use tracing::debug;

use super::{GenerationBackend, artifact_path, ensure_base_dir, file_uri};
use crate::config::MediaConfig;
use crate::models::{MediaAsset, SceneSpec};

/// Always succeeds. The file it writes describes what would have been
/// generated.
#[derive(Debug, Clone)]
pub struct StubBackend {
    base_path: PathBuf,
}

impl StubBackend {
    /// Creates a stub writing under `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl<C: MediaConfig> GenerationBackend<C> for StubBackend {
    async fn generate(
        &self,
        scene: &SceneSpec,
        prompt: &str,
        config: &C,
    ) -> Result<MediaAsset, DomainError> {
        ensure_base_dir(&self.base_path).await?;
        let path = artifact_path(&self.base_path, C::KIND, &scene.identifier, config.extension())?;

        let mut contents = format!(
            "{} render for {}\nPrompt: {prompt}\nResolution: {}\n",
            C::KIND,
            scene.identifier,
            config.resolution()
        );
        for (name, value) in config.parameters() {
            let _ = writeln!(contents, "{name}: {value}");
        }
        tokio::fs::write(&path, contents).await.map_err(|e| {
            DomainError::Infrastructure(format!("failed to write {}: {e}", path.display()))
        })?;
        debug!(media_kind = %C::KIND, path = %path.display(), "stub artifact written");

        let mut metadata = BTreeMap::new();
        metadata.insert("mode".to_owned(), json!("stub"));
        metadata.insert("format".to_owned(), json!(config.extension()));
        metadata.insert("path".to_owned(), json!(path.display().to_string()));
        Ok(MediaAsset {
            uri: file_uri(&path)?,
            mime_type: config.mime_type().to_owned(),
            metadata,
        })
    }
}
