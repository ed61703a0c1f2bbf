//! Image and video generation configs.
//!
//! Configs are built from plain parameter structs and validated on the way
//! in: an unsupported format or a zero ceiling never reaches a backend.

use seidra_core::error::DomainError;
use serde::{Deserialize, Serialize};

use crate::models::{MediaKind, MediaResolution, StyleProfile};
use crate::validation::{
    DEFAULT_IMAGE_MAX_SIZE_BYTES, DEFAULT_VIDEO_MAX_SIZE_BYTES, ImageFormat, VideoFormat,
    validate_ceiling,
};

/// What a backend needs to know about a config, regardless of media kind.
pub trait MediaConfig: Send + Sync + 'static {
    /// Media kind this config produces.
    const KIND: MediaKind;

    /// Target resolution.
    fn resolution(&self) -> MediaResolution;

    /// Optional style.
    fn style(&self) -> Option<&StyleProfile>;

    /// Optional seed.
    fn seed(&self) -> Option<u64>;

    /// File extension of the output format.
    fn extension(&self) -> &'static str;

    /// Fixed MIME type of the output format.
    fn mime_type(&self) -> &'static str;

    /// Largest acceptable artifact, in bytes.
    fn max_size_bytes(&self) -> u64;

    /// Kind-specific numeric parameters, as `(name, value)` pairs.
    fn parameters(&self) -> Vec<(&'static str, String)>;
}

/// Unvalidated image parameters, as received from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfigParams {
    /// Target resolution.
    pub resolution: MediaResolution,
    /// Optional style.
    #[serde(default)]
    pub style: Option<StyleProfile>,
    /// Diffusion steps.
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Classifier-free guidance scale.
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    /// Optional seed.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Requested output format (`png`, `jpg`, `jpeg`).
    #[serde(default = "default_image_format")]
    pub output_format: String,
    /// Size ceiling in bytes.
    #[serde(default = "default_image_max_size")]
    pub max_size_bytes: u64,
}

fn default_steps() -> u32 {
    30
}

fn default_guidance_scale() -> f64 {
    7.5
}

fn default_image_format() -> String {
    "png".to_owned()
}

fn default_image_max_size() -> u64 {
    DEFAULT_IMAGE_MAX_SIZE_BYTES
}

fn default_fps() -> u32 {
    24
}

fn default_video_format() -> String {
    "mp4".to_owned()
}

fn default_video_max_size() -> u64 {
    DEFAULT_VIDEO_MAX_SIZE_BYTES
}

impl ImageConfigParams {
    /// Parameters with defaults for everything but the resolution.
    #[must_use]
    pub fn new(resolution: MediaResolution) -> Self {
        Self {
            resolution,
            style: None,
            steps: default_steps(),
            guidance_scale: default_guidance_scale(),
            seed: None,
            output_format: default_image_format(),
            max_size_bytes: default_image_max_size(),
        }
    }
}

/// Validated image generation config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ImageConfigParams")]
pub struct ImageGenerationConfig {
    resolution: MediaResolution,
    style: Option<StyleProfile>,
    steps: u32,
    guidance_scale: f64,
    seed: Option<u64>,
    output_format: ImageFormat,
    max_size_bytes: u64,
}

impl TryFrom<ImageConfigParams> for ImageGenerationConfig {
    type Error = DomainError;

    fn try_from(params: ImageConfigParams) -> Result<Self, Self::Error> {
        let output_format: ImageFormat = params.output_format.parse()?;
        validate_ceiling(params.max_size_bytes, MediaKind::Image)?;
        if params.steps == 0 {
            return Err(DomainError::Validation("steps must be positive".into()));
        }
        if !params.guidance_scale.is_finite() || params.guidance_scale < 0.0 {
            return Err(DomainError::Validation(format!(
                "guidance_scale must be a non-negative number, got {}",
                params.guidance_scale
            )));
        }
        Ok(Self {
            resolution: params.resolution,
            style: params.style,
            steps: params.steps,
            guidance_scale: params.guidance_scale,
            seed: params.seed,
            output_format,
            max_size_bytes: params.max_size_bytes,
        })
    }
}

impl ImageGenerationConfig {
    /// Diffusion steps.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Guidance scale.
    #[must_use]
    pub fn guidance_scale(&self) -> f64 {
        self.guidance_scale
    }

    /// Output format.
    #[must_use]
    pub fn output_format(&self) -> ImageFormat {
        self.output_format
    }
}

impl MediaConfig for ImageGenerationConfig {
    const KIND: MediaKind = MediaKind::Image;

    fn resolution(&self) -> MediaResolution {
        self.resolution
    }

    fn style(&self) -> Option<&StyleProfile> {
        self.style.as_ref()
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn extension(&self) -> &'static str {
        self.output_format.extension()
    }

    fn mime_type(&self) -> &'static str {
        self.output_format.mime_type()
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("steps", self.steps.to_string()),
            ("guidance_scale", format!("{:?}", self.guidance_scale)),
        ]
    }
}

/// Unvalidated video parameters, as received from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfigParams {
    /// Target resolution.
    pub resolution: MediaResolution,
    /// Clip length in seconds.
    pub duration_seconds: f64,
    /// Frames per second.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Optional style.
    #[serde(default)]
    pub style: Option<StyleProfile>,
    /// Optional seed.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Requested output format (`mp4`, `webm`).
    #[serde(default = "default_video_format")]
    pub output_format: String,
    /// Size ceiling in bytes.
    #[serde(default = "default_video_max_size")]
    pub max_size_bytes: u64,
}

impl VideoConfigParams {
    /// Parameters with defaults for everything but resolution and duration.
    #[must_use]
    pub fn new(resolution: MediaResolution, duration_seconds: f64) -> Self {
        Self {
            resolution,
            duration_seconds,
            fps: default_fps(),
            style: None,
            seed: None,
            output_format: default_video_format(),
            max_size_bytes: default_video_max_size(),
        }
    }
}

/// Validated video generation config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VideoConfigParams")]
pub struct VideoGenerationConfig {
    resolution: MediaResolution,
    duration_seconds: f64,
    fps: u32,
    style: Option<StyleProfile>,
    seed: Option<u64>,
    output_format: VideoFormat,
    max_size_bytes: u64,
}

impl TryFrom<VideoConfigParams> for VideoGenerationConfig {
    type Error = DomainError;

    fn try_from(params: VideoConfigParams) -> Result<Self, Self::Error> {
        let output_format: VideoFormat = params.output_format.parse()?;
        validate_ceiling(params.max_size_bytes, MediaKind::Video)?;
        if !params.duration_seconds.is_finite() || params.duration_seconds <= 0.0 {
            return Err(DomainError::Validation(format!(
                "duration_seconds must be positive, got {}",
                params.duration_seconds
            )));
        }
        if params.fps == 0 {
            return Err(DomainError::Validation("fps must be positive".into()));
        }
        Ok(Self {
            resolution: params.resolution,
            duration_seconds: params.duration_seconds,
            fps: params.fps,
            style: params.style,
            seed: params.seed,
            output_format,
            max_size_bytes: params.max_size_bytes,
        })
    }
}

impl VideoGenerationConfig {
    /// Clip length in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Frames per second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Output format.
    #[must_use]
    pub fn output_format(&self) -> VideoFormat {
        self.output_format
    }
}

impl MediaConfig for VideoGenerationConfig {
    const KIND: MediaKind = MediaKind::Video;

    fn resolution(&self) -> MediaResolution {
        self.resolution
    }

    fn style(&self) -> Option<&StyleProfile> {
        self.style.as_ref()
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn extension(&self) -> &'static str {
        self.output_format.extension()
    }

    fn mime_type(&self) -> &'static str {
        self.output_format.mime_type()
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("duration_seconds", format!("{:?}", self.duration_seconds)),
            ("fps", self.fps.to_string()),
        ]
    }
}
