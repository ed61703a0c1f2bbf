//! Shared application state.

use std::sync::Arc;

use seidra_character::domain::aggregates::Character;
use seidra_core::clock::SharedClock;
use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use seidra_media::{LocalCommandBackend, MediaOrchestrator, NarrativePromptRenderer, StubBackend};
use seidra_prompt::domain::aggregates::Prompt;
use seidra_render::domain::aggregates::RenderJob;
use seidra_scenario::domain::aggregates::Scenario;
use seidra_store::open_repository;
use tracing::info;

use crate::config::Config;

/// One repository per record kind.
#[derive(Clone)]
pub struct Repositories {
    /// Character records.
    pub characters: Arc<dyn RecordRepository<Character>>,
    /// Scenario records.
    pub scenarios: Arc<dyn RecordRepository<Scenario>>,
    /// Prompt records.
    pub prompts: Arc<dyn RecordRepository<Prompt>>,
    /// Render jobs.
    pub renders: Arc<dyn RecordRepository<RenderJob>>,
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for handler timestamps.
    pub clock: SharedClock,
    /// Record repositories.
    pub repositories: Repositories,
    /// Backend registry and dispatcher.
    pub orchestrator: Arc<MediaOrchestrator>,
    /// Backend used when a render request names none.
    pub default_model_name: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("orchestrator", &self.orchestrator)
            .field("default_model_name", &self.default_model_name)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: SharedClock,
        repositories: Repositories,
        orchestrator: Arc<MediaOrchestrator>,
        default_model_name: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            repositories,
            orchestrator,
            default_model_name: default_model_name.into(),
        }
    }

    /// Opens every record store with the configured layout and registers the
    /// configured backends.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a store cannot be opened.
    pub async fn open(config: &Config, clock: SharedClock) -> Result<Self, DomainError> {
        let layout = config.store_layout;
        let data_dir = config.data_dir.as_path();
        let repositories = Repositories {
            characters: Arc::new(
                open_repository::<Character>(layout, data_dir, clock.clone()).await?,
            ),
            scenarios: Arc::new(
                open_repository::<Scenario>(layout, data_dir, clock.clone()).await?,
            ),
            prompts: Arc::new(
                open_repository::<Prompt>(layout, data_dir, clock.clone()).await?,
            ),
            renders: Arc::new(
                open_repository::<RenderJob>(layout, data_dir, clock.clone()).await?,
            ),
        };
        info!(data_dir = %data_dir.display(), ?layout, "record stores opened");

        let orchestrator = register_backends(config);
        Ok(Self::new(
            clock,
            repositories,
            Arc::new(orchestrator),
            config.default_model_name.clone(),
        ))
    }
}

/// `stub` is always available; `local` only when its command is configured.
fn register_backends(config: &Config) -> MediaOrchestrator {
    let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
    let stub = Arc::new(StubBackend::new(&config.artifacts_dir));
    orchestrator.register_image_model("stub", stub.clone());
    orchestrator.register_video_model("stub", stub);

    if let Some(command) = &config.local_image_command {
        orchestrator.register_image_model(
            "local",
            Arc::new(LocalCommandBackend::new(&config.artifacts_dir, command.clone())),
        );
    }
    if let Some(command) = &config.local_video_command {
        orchestrator.register_video_model(
            "local",
            Arc::new(LocalCommandBackend::new(&config.artifacts_dir, command.clone())),
        );
    }
    orchestrator
}

#[cfg(test)]
pub(crate) mod test_state {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use seidra_core::clock::SharedClock;
    use seidra_core::record::VersionedRecord;
    use seidra_media::{MediaOrchestrator, NarrativePromptRenderer};
    use seidra_store::SnapshotRepository;
    use seidra_test_support::{MemorySnapshotStore, RecordingBackend, SteppingClock};

    use super::{AppState, Character, Prompt, RenderJob, Repositories, Scenario};

    async fn memory_repo<R: VersionedRecord>(clock: &SharedClock) -> Arc<SnapshotRepository<R>> {
        Arc::new(
            SnapshotRepository::open(Arc::new(MemorySnapshotStore::new()), clock.clone())
                .await
                .unwrap(),
        )
    }

    /// State over in-memory stores, with a recording `stub` backend for
    /// both media kinds.
    pub(crate) async fn memory_app_state() -> AppState {
        let clock: SharedClock = Arc::new(SteppingClock::starting_at(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        let repositories = Repositories {
            characters: memory_repo::<Character>(&clock).await,
            scenarios: memory_repo::<Scenario>(&clock).await,
            prompts: memory_repo::<Prompt>(&clock).await,
            renders: memory_repo::<RenderJob>(&clock).await,
        };
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        let backend = Arc::new(RecordingBackend::new("file:///artifacts/asset"));
        orchestrator.register_image_model("stub", backend.clone());
        orchestrator.register_video_model("stub", backend);
        AppState::new(clock, repositories, Arc::new(orchestrator), "stub")
    }
}
