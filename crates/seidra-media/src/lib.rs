//! Seidra — media generation.
//!
//! Turns narrative value objects (scenes, characters, prompts, styles) into
//! image and video assets through pluggable, named backends. The
//! [`MediaOrchestrator`] renders the prompt and dispatches; everything about
//! formats and size ceilings lives in the config types and the backends.

pub mod backend;
pub mod config;
pub mod models;
pub mod orchestrator;
pub mod renderer;
pub mod template;
pub mod validation;

pub use backend::GenerationBackend;
pub use backend::local_command::LocalCommandBackend;
pub use backend::stub::StubBackend;
pub use config::{
    ImageConfigParams, ImageGenerationConfig, MediaConfig, VideoConfigParams,
    VideoGenerationConfig,
};
pub use models::{
    CharacterProfile, MediaAsset, MediaKind, MediaResolution, PromptSpec, SceneSpec, StyleProfile,
};
pub use orchestrator::MediaOrchestrator;
pub use renderer::{NarrativePromptRenderer, PromptRenderer};
pub use template::CommandTemplate;
pub use validation::{ImageFormat, VideoFormat};
