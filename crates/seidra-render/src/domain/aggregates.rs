//! Render job record and its lifecycle.

use chrono::{DateTime, Utc};
use seidra_core::error::DomainError;
use seidra_core::record::{CURRENT_SCHEMA_VERSION, VersionedRecord};
use seidra_media::{
    ImageGenerationConfig, MediaAsset, MediaKind, PromptSpec, SceneSpec, VideoGenerationConfig,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a render job. Moves once, from `InProgress` to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    /// Dispatched, no asset yet.
    InProgress,
    /// Asset attached.
    Completed,
}

/// Generation config of a job; the variant fixes the media kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "config", rename_all = "snake_case")]
pub enum RenderConfig {
    /// Still image.
    Image(ImageGenerationConfig),
    /// Video clip.
    Video(VideoGenerationConfig),
}

impl RenderConfig {
    /// Media kind produced by this config.
    #[must_use]
    pub fn media_kind(&self) -> MediaKind {
        match self {
            Self::Image(_) => MediaKind::Image,
            Self::Video(_) => MediaKind::Video,
        }
    }
}

/// A stored render job snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    /// Record identifier.
    pub id: Uuid,
    /// Scene as submitted.
    pub scene: SceneSpec,
    /// Prompt as submitted.
    pub prompt: PromptSpec,
    /// Generation config as submitted.
    pub config: RenderConfig,
    /// Name of the backend the job was dispatched to.
    pub model_name: String,
    /// Current status.
    pub status: RenderStatus,
    /// Produced asset, once completed.
    #[serde(default)]
    pub asset: Option<MediaAsset>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the asset attached.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Snapshot schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl RenderJob {
    /// Builds a job in `InProgress`.
    #[must_use]
    pub fn start(
        id: Uuid,
        scene: SceneSpec,
        prompt: PromptSpec,
        config: RenderConfig,
        model_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            scene,
            prompt,
            config,
            model_name,
            status: RenderStatus::InProgress,
            asset: None,
            created_at: now,
            completed_at: None,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Media kind of the job.
    #[must_use]
    pub fn media_kind(&self) -> MediaKind {
        self.config.media_kind()
    }

    /// Attaches `asset` and moves the job to `Completed`. The completion
    /// time never precedes the creation time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the job is already completed.
    pub fn complete(&mut self, asset: MediaAsset, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status == RenderStatus::Completed {
            return Err(DomainError::Validation(format!(
                "render {} is already completed",
                self.id
            )));
        }
        self.status = RenderStatus::Completed;
        self.asset = Some(asset);
        self.completed_at = Some(now.max(self.created_at));
        Ok(())
    }
}

impl VersionedRecord for RenderJob {
    const KIND: &'static str = "render";
    const STORE: &'static str = "renders";

    fn id(&self) -> Uuid {
        self.id
    }
}
