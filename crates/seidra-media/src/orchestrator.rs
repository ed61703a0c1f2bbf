//! Named backend registries and dispatch.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use seidra_core::error::DomainError;
use tracing::{info, instrument};

use crate::backend::GenerationBackend;
use crate::config::{ImageGenerationConfig, MediaConfig, VideoGenerationConfig};
use crate::models::{MediaAsset, PromptSpec, SceneSpec};
use crate::renderer::PromptRenderer;

type Entries<C> = BTreeMap<String, Arc<dyn GenerationBackend<C>>>;

/// Name → backend map for one media kind.
///
/// Writers swap in a new map; readers clone the current `Arc` and never see
/// a half-applied registration.
pub struct BackendRegistry<C: MediaConfig> {
    entries: RwLock<Arc<Entries<C>>>,
}

impl<C: MediaConfig> Default for BackendRegistry<C> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Arc::new(BTreeMap::new())),
        }
    }
}

impl<C: MediaConfig> BackendRegistry<C> {
    fn snapshot(&self) -> Arc<Entries<C>> {
        let guard = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Inserts or replaces `name`.
    pub fn register(&self, name: impl Into<String>, backend: Arc<dyn GenerationBackend<C>>) {
        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut next = (**guard).clone();
        next.insert(name.into(), backend);
        *guard = Arc::new(next);
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.snapshot().keys().cloned().collect()
    }

    /// Looks up `name`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BackendNotFound` listing the registered names.
    pub fn get(&self, name: &str) -> Result<Arc<dyn GenerationBackend<C>>, DomainError> {
        let entries = self.snapshot();
        entries
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::BackendNotFound {
                media_kind: C::KIND.as_str(),
                name: name.to_owned(),
                available: entries.keys().cloned().collect(),
            })
    }
}

/// Renders prompts and routes generation requests to named backends.
pub struct MediaOrchestrator {
    renderer: Arc<dyn PromptRenderer>,
    images: BackendRegistry<ImageGenerationConfig>,
    videos: BackendRegistry<VideoGenerationConfig>,
}

impl std::fmt::Debug for MediaOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaOrchestrator")
            .field("image_models", &self.images.names())
            .field("video_models", &self.videos.names())
            .finish_non_exhaustive()
    }
}

impl MediaOrchestrator {
    /// Creates an orchestrator with empty registries.
    #[must_use]
    pub fn new(renderer: Arc<dyn PromptRenderer>) -> Self {
        Self {
            renderer,
            images: BackendRegistry::default(),
            videos: BackendRegistry::default(),
        }
    }

    /// Registers an image backend; an existing entry with the same name is replaced.
    pub fn register_image_model(
        &self,
        name: impl Into<String>,
        backend: Arc<dyn GenerationBackend<ImageGenerationConfig>>,
    ) {
        let name = name.into();
        info!(model = %name, "registered image model");
        self.images.register(name, backend);
    }

    /// Registers a video backend; an existing entry with the same name is replaced.
    pub fn register_video_model(
        &self,
        name: impl Into<String>,
        backend: Arc<dyn GenerationBackend<VideoGenerationConfig>>,
    ) {
        let name = name.into();
        info!(model = %name, "registered video model");
        self.videos.register(name, backend);
    }

    /// Registered image backend names, sorted.
    #[must_use]
    pub fn image_model_names(&self) -> Vec<String> {
        self.images.names()
    }

    /// Registered video backend names, sorted.
    #[must_use]
    pub fn video_model_names(&self) -> Vec<String> {
        self.videos.names()
    }

    /// Generates an image with the backend registered as `model_name`.
    ///
    /// # Errors
    ///
    /// `DomainError::BackendNotFound` for an unknown name; otherwise whatever
    /// the backend returns.
    #[instrument(skip(self, prompt, config), fields(scene = %scene.identifier))]
    pub async fn generate_image(
        &self,
        scene: &SceneSpec,
        prompt: &PromptSpec,
        config: &ImageGenerationConfig,
        model_name: &str,
    ) -> Result<MediaAsset, DomainError> {
        self.dispatch(&self.images, scene, prompt, config, model_name)
            .await
    }

    /// Generates a video with the backend registered as `model_name`.
    ///
    /// # Errors
    ///
    /// `DomainError::BackendNotFound` for an unknown name; otherwise whatever
    /// the backend returns.
    #[instrument(skip(self, prompt, config), fields(scene = %scene.identifier))]
    pub async fn generate_video(
        &self,
        scene: &SceneSpec,
        prompt: &PromptSpec,
        config: &VideoGenerationConfig,
        model_name: &str,
    ) -> Result<MediaAsset, DomainError> {
        self.dispatch(&self.videos, scene, prompt, config, model_name)
            .await
    }

    async fn dispatch<C: MediaConfig>(
        &self,
        registry: &BackendRegistry<C>,
        scene: &SceneSpec,
        prompt: &PromptSpec,
        config: &C,
        model_name: &str,
    ) -> Result<MediaAsset, DomainError> {
        let backend = registry.get(model_name)?;
        let rendered = self.renderer.render(scene, prompt);
        backend.generate(scene, &rendered, config).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::{ImageConfigParams, VideoConfigParams};
    use crate::models::MediaResolution;
    use crate::renderer::NarrativePromptRenderer;

    use super::*;

    struct FixedAsset {
        uri: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedAsset {
        fn new(uri: &'static str) -> Arc<Self> {
            Arc::new(Self {
                uri,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl<C: MediaConfig> GenerationBackend<C> for FixedAsset {
        async fn generate(
            &self,
            _scene: &SceneSpec,
            prompt: &str,
            config: &C,
        ) -> Result<MediaAsset, DomainError> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            Ok(MediaAsset {
                uri: self.uri.to_owned(),
                mime_type: config.mime_type().to_owned(),
                metadata: BTreeMap::new(),
            })
        }
    }

    fn orchestrator() -> MediaOrchestrator {
        MediaOrchestrator::new(Arc::new(NarrativePromptRenderer))
    }

    fn image_config() -> ImageGenerationConfig {
        ImageGenerationConfig::try_from(ImageConfigParams::new(MediaResolution::new(8, 8).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_model_lists_sorted_names() {
        // Arrange
        let orchestrator = orchestrator();
        orchestrator.register_image_model("zeta", FixedAsset::new("file:///z"));
        orchestrator.register_image_model("alpha", FixedAsset::new("file:///a"));
        let scene = SceneSpec::new("s1", "x");
        let prompt = PromptSpec::new("p").unwrap();

        // Act
        let result = orchestrator
            .generate_image(&scene, &prompt, &image_config(), "missing")
            .await;

        // Assert
        match result {
            Err(DomainError::BackendNotFound { media_kind, name, available }) => {
                assert_eq!(media_kind, "image");
                assert_eq!(name, "missing");
                assert_eq!(available, vec!["alpha".to_owned(), "zeta".to_owned()]);
            }
            other => panic!("expected BackendNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let orchestrator = orchestrator();
        orchestrator.register_image_model("m", FixedAsset::new("file:///first"));
        orchestrator.register_image_model("m", FixedAsset::new("file:///second"));

        let asset = orchestrator
            .generate_image(&SceneSpec::new("s1", "x"), &PromptSpec::new("p").unwrap(), &image_config(), "m")
            .await
            .unwrap();

        assert_eq!(asset.uri, "file:///second");
        assert_eq!(orchestrator.image_model_names(), vec!["m".to_owned()]);
    }

    #[tokio::test]
    async fn test_backend_receives_rendered_prompt_and_asset_is_unmodified() {
        let orchestrator = orchestrator();
        let backend = FixedAsset::new("file:///clip.webm");
        orchestrator.register_video_model("v", backend.clone());
        let scene = SceneSpec::new("s1", "Chase").with_mood("frantic");
        let prompt = PromptSpec::new("{scene_summary} ({scene_mood})").unwrap();
        let mut params = VideoConfigParams::new(MediaResolution::new(8, 8).unwrap(), 1.0);
        params.output_format = "webm".to_owned();
        let config = VideoGenerationConfig::try_from(params).unwrap();

        let asset = orchestrator
            .generate_video(&scene, &prompt, &config, "v")
            .await
            .unwrap();

        assert_eq!(asset.uri, "file:///clip.webm");
        assert_eq!(asset.mime_type, "video/webm");
        assert!(asset.metadata.is_empty());
        assert_eq!(*backend.prompts.lock().unwrap(), vec!["Chase (frantic)".to_owned()]);
    }

    #[test]
    fn test_image_and_video_registries_are_separate() {
        let orchestrator = orchestrator();
        orchestrator.register_image_model("stub", FixedAsset::new("file:///i"));

        assert_eq!(orchestrator.image_model_names(), vec!["stub".to_owned()]);
        assert!(orchestrator.video_model_names().is_empty());
    }
}
