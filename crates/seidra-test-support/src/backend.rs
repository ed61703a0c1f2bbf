//! Test backends — `GenerationBackend` implementations for orchestration tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use seidra_core::error::DomainError;
use seidra_media::{GenerationBackend, MediaAsset, MediaConfig, SceneSpec};

/// A backend that records every call as `(scene identifier, rendered prompt)`
/// and returns a canned asset. The asset's MIME type is taken from the config.
#[derive(Debug)]
pub struct RecordingBackend {
    uri: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingBackend {
    /// Create a backend that answers every call with an asset at `uri`.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<C: MediaConfig> GenerationBackend<C> for RecordingBackend {
    async fn generate(
        &self,
        scene: &SceneSpec,
        prompt: &str,
        config: &C,
    ) -> Result<MediaAsset, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((scene.identifier.clone(), prompt.to_owned()));
        let mut metadata = BTreeMap::new();
        metadata.insert("mode".to_owned(), serde_json::json!("recording"));
        Ok(MediaAsset {
            uri: self.uri.clone(),
            mime_type: config.mime_type().to_owned(),
            metadata,
        })
    }
}

/// A backend that fails every call with an execution error.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl<C: MediaConfig> GenerationBackend<C> for FailingBackend {
    async fn generate(
        &self,
        _scene: &SceneSpec,
        _prompt: &str,
        _config: &C,
    ) -> Result<MediaAsset, DomainError> {
        Err(DomainError::Execution {
            command: "failing-backend".into(),
            exit_code: Some(1),
            stderr: "generation failed".into(),
        })
    }
}
