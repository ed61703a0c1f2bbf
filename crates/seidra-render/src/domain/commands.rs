//! Commands for render jobs.

use seidra_media::{PromptSpec, SceneSpec};

use crate::domain::aggregates::RenderConfig;

/// Command to render one asset.
#[derive(Debug, Clone)]
pub struct StartRender {
    /// Scene to render.
    pub scene: SceneSpec,
    /// Prompt to render it with.
    pub prompt: PromptSpec,
    /// Image or video config.
    pub config: RenderConfig,
    /// Registered backend name.
    pub model_name: String,
}
