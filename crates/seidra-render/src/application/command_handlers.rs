//! Command handlers for render jobs.

use seidra_core::clock::Clock;
use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use seidra_media::MediaOrchestrator;
use seidra_media::backend::validate_scene_identifier;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::{RenderConfig, RenderJob};
use crate::domain::commands::StartRender;

/// Handles `StartRender`: records an in-progress job, dispatches it to the
/// named backend and persists the completed job.
///
/// When generation fails the job stays `in_progress` in storage and the
/// backend's error is returned.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank model name or a scene
/// identifier that cannot name an artifact file, `DomainError::BackendNotFound` for an unknown model, and any
/// error raised by the backend or the repository.
#[instrument(skip_all, fields(model = %command.model_name, scene = %command.scene.identifier))]
pub async fn handle_render(
    command: StartRender,
    clock: &dyn Clock,
    orchestrator: &MediaOrchestrator,
    repo: &dyn RecordRepository<RenderJob>,
) -> Result<RenderJob, DomainError> {
    if command.model_name.trim().is_empty() {
        return Err(DomainError::Validation(
            "model name must not be empty".into(),
        ));
    }
    validate_scene_identifier(&command.scene.identifier)?;

    let mut job = repo
        .create(RenderJob::start(
            Uuid::new_v4(),
            command.scene,
            command.prompt,
            command.config,
            command.model_name,
            clock.now(),
        ))
        .await?;
    info!(render_id = %job.id, media_kind = %job.media_kind(), "render started");

    let generated = match &job.config {
        RenderConfig::Image(config) => {
            orchestrator
                .generate_image(&job.scene, &job.prompt, config, &job.model_name)
                .await
        }
        RenderConfig::Video(config) => {
            orchestrator
                .generate_video(&job.scene, &job.prompt, config, &job.model_name)
                .await
        }
    };
    let asset = generated.inspect_err(|e| {
        warn!(render_id = %job.id, error = %e, "render failed");
    })?;

    job.complete(asset, clock.now())?;
    let completed = repo.update(job).await?;
    info!(render_id = %completed.id, uri = ?completed.asset.as_ref().map(|a| &a.uri), "render completed");
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use seidra_core::error::DomainError;
    use seidra_core::repository::RecordRepository;
    use seidra_media::{
        ImageConfigParams, ImageGenerationConfig, MediaOrchestrator, MediaResolution,
        NarrativePromptRenderer, PromptSpec, SceneSpec, StubBackend, VideoConfigParams,
        VideoGenerationConfig,
    };
    use seidra_store::SnapshotRepository;
    use seidra_test_support::{FailingBackend, MemorySnapshotStore, RecordingBackend, SteppingClock};

    use crate::application::command_handlers::handle_render;
    use crate::domain::aggregates::{RenderConfig, RenderJob, RenderStatus};
    use crate::domain::commands::StartRender;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    async fn memory_repo() -> SnapshotRepository<RenderJob> {
        SnapshotRepository::open(
            Arc::new(MemorySnapshotStore::new()),
            Arc::new(SteppingClock::starting_at(start())),
        )
        .await
        .unwrap()
    }

    fn image_config() -> RenderConfig {
        RenderConfig::Image(
            ImageGenerationConfig::try_from(ImageConfigParams::new(
                MediaResolution::new(512, 512).unwrap(),
            ))
            .unwrap(),
        )
    }

    fn command(model_name: &str, config: RenderConfig) -> StartRender {
        StartRender {
            scene: SceneSpec::new("s1", "Docks at dawn").with_mood("hushed"),
            prompt: PromptSpec::new("{scene_summary}, {scene_mood}").unwrap(),
            config,
            model_name: model_name.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_handle_render_completes_job_with_backend_asset() {
        // Arrange
        let clock = SteppingClock::starting_at(start());
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        let backend = Arc::new(RecordingBackend::new("file:///tmp/image_s1.png"));
        orchestrator.register_image_model("recording", backend.clone());
        let repo = memory_repo().await;

        // Act
        let job = handle_render(command("recording", image_config()), &clock, &orchestrator, &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(job.status, RenderStatus::Completed);
        assert_eq!(job.created_at, start());
        assert_eq!(job.completed_at, Some(start() + Duration::seconds(1)));
        assert_eq!(job.asset.as_ref().unwrap().uri, "file:///tmp/image_s1.png");
        assert_eq!(
            backend.calls(),
            vec![("s1".to_owned(), "Docks at dawn, hushed".to_owned())]
        );
        assert_eq!(repo.read(job.id).await.unwrap(), job);
        assert_eq!(repo.history(job.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_handle_render_failure_leaves_job_in_progress() {
        // Arrange
        let clock = SteppingClock::starting_at(start());
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        orchestrator.register_image_model("broken", Arc::new(FailingBackend));
        let repo = memory_repo().await;

        // Act
        let result = handle_render(command("broken", image_config()), &clock, &orchestrator, &repo).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Execution { .. })));
        let jobs = repo.list().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, RenderStatus::InProgress);
        assert!(jobs[0].asset.is_none());
    }

    #[tokio::test]
    async fn test_handle_render_unknown_model_lists_available() {
        let clock = SteppingClock::starting_at(start());
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        orchestrator.register_image_model("stub", Arc::new(RecordingBackend::new("file:///x")));
        let repo = memory_repo().await;

        let result = handle_render(command("sdxl", image_config()), &clock, &orchestrator, &repo).await;

        match result {
            Err(DomainError::BackendNotFound { name, available, .. }) => {
                assert_eq!(name, "sdxl");
                assert_eq!(available, vec!["stub".to_owned()]);
            }
            other => panic!("expected BackendNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_render_rejects_blank_model_without_creating_job() {
        let clock = SteppingClock::starting_at(start());
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        let repo = memory_repo().await;

        let result = handle_render(command("  ", image_config()), &clock, &orchestrator, &repo).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_render_rejects_unusable_scene_identifier_without_creating_job() {
        // Arrange
        let clock = SteppingClock::starting_at(start());
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        orchestrator.register_image_model("stub", Arc::new(RecordingBackend::new("file:///x")));
        let repo = memory_repo().await;

        for identifier in ["a/b", "../up", " "] {
            let mut cmd = command("stub", image_config());
            cmd.scene = SceneSpec::new(identifier, "Docks at dawn");

            // Act
            let result = handle_render(cmd, &clock, &orchestrator, &repo).await;

            // Assert
            match result {
                Err(DomainError::Validation(msg)) => assert!(msg.contains("scene identifier")),
                other => panic!("expected Validation for {identifier:?}, got {other:?}"),
            }
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_render_video_through_stub_backend() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let clock = SteppingClock::starting_at(start());
        let orchestrator = MediaOrchestrator::new(Arc::new(NarrativePromptRenderer));
        orchestrator.register_video_model("stub", Arc::new(StubBackend::new(dir.path())));
        let repo = memory_repo().await;
        let config = VideoGenerationConfig::try_from(VideoConfigParams::new(
            MediaResolution::new(320, 240).unwrap(),
            3.0,
        ))
        .unwrap();

        // Act
        let job = handle_render(command("stub", RenderConfig::Video(config)), &clock, &orchestrator, &repo)
            .await
            .unwrap();

        // Assert
        let asset = job.asset.unwrap();
        assert_eq!(asset.mime_type, "video/mp4");
        assert_eq!(asset.metadata["mode"], "stub");
        assert!(dir.path().join("video_s1.mp4").is_file());
    }
}
