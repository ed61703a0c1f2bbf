//! Prompt rendering.

use crate::models::{PromptSpec, SceneSpec};
use crate::template::{substitute, value_to_text};

/// Turns a scene and a prompt into the text handed to a backend.
pub trait PromptRenderer: Send + Sync {
    /// Renders `prompt` in the context of `scene`. Never fails.
    fn render(&self, scene: &SceneSpec, prompt: &PromptSpec) -> String;
}

/// Default renderer: prompt variables plus derived scene fields.
///
/// Scene fields (`scene_summary`, `scene_location`, `scene_mood`,
/// `characters`) always take precedence over prompt variables of the same
/// name, even when the scene leaves them unset. Anything else unresolved
/// renders as an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativePromptRenderer;

impl NarrativePromptRenderer {
    fn scene_field(scene: &SceneSpec, name: &str) -> Option<String> {
        match name {
            "scene_summary" => Some(scene.summary.clone()),
            "scene_location" => Some(scene.location.clone().unwrap_or_default()),
            "scene_mood" => Some(scene.mood.clone().unwrap_or_default()),
            "characters" => Some(scene.character_names()),
            _ => None,
        }
    }
}

impl PromptRenderer for NarrativePromptRenderer {
    fn render(&self, scene: &SceneSpec, prompt: &PromptSpec) -> String {
        substitute(prompt.template(), |name| {
            Self::scene_field(scene, name)
                .or_else(|| prompt.variables().get(name).map(value_to_text))
        })
    }
}
