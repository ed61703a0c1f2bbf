//! Value objects consumed and produced by the generation pipeline.

use std::collections::BTreeMap;
use std::fmt;

use seidra_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The two families of generated media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
}

impl MediaKind {
    /// Lowercase name, used in file names and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character as it appears in a scene to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Character identifier.
    pub identifier: String,
    /// Display name, joined into the `characters` prompt variable.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Notable traits.
    #[serde(default)]
    pub traits: Vec<String>,
    /// Arbitrary extra data.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A scene involving one or more characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    /// Scene identifier; keys the backend output location.
    pub identifier: String,
    /// One-line summary.
    pub summary: String,
    /// Characters in order of appearance.
    #[serde(default)]
    pub characters: Vec<CharacterProfile>,
    /// Where the scene takes place.
    #[serde(default)]
    pub location: Option<String>,
    /// Emotional tone.
    #[serde(default)]
    pub mood: Option<String>,
}

impl SceneSpec {
    /// Creates a scene with no characters, location or mood.
    #[must_use]
    pub fn new(identifier: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            summary: summary.into(),
            characters: Vec::new(),
            location: None,
            mood: None,
        }
    }

    /// Appends a character.
    #[must_use]
    pub fn with_character(mut self, character: CharacterProfile) -> Self {
        self.characters.push(character);
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the mood.
    #[must_use]
    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    /// Comma-joined character names, in scene order.
    #[must_use]
    pub fn character_names(&self) -> String {
        self.characters
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Visual or narrative style applied to a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Style name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Style tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A prompt template with its variables and an optional version tag.
///
/// The template is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PromptSpecFields")]
pub struct PromptSpec {
    template: String,
    variables: BTreeMap<String, serde_json::Value>,
    version: Option<String>,
}

#[derive(Deserialize)]
struct PromptSpecFields {
    template: String,
    #[serde(default)]
    variables: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    version: Option<String>,
}

impl TryFrom<PromptSpecFields> for PromptSpec {
    type Error = DomainError;

    fn try_from(fields: PromptSpecFields) -> Result<Self, Self::Error> {
        let mut spec = Self::new(fields.template)?;
        spec.variables = fields.variables;
        spec.version = fields.version;
        Ok(spec)
    }
}

impl PromptSpec {
    /// Creates a prompt with no variables.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `template` is blank.
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(DomainError::Validation(
                "prompt template must not be empty".into(),
            ));
        }
        Ok(Self {
            template,
            variables: BTreeMap::new(),
            version: None,
        })
    }

    /// Adds or replaces a variable.
    #[must_use]
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Replaces all variables.
    #[must_use]
    pub fn with_variables(mut self, variables: BTreeMap<String, serde_json::Value>) -> Self {
        self.variables = variables;
        self
    }

    /// Sets the version tag.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Template variables.
    #[must_use]
    pub fn variables(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.variables
    }

    /// Optional version tag.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Target output size in pixels. Both dimensions are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResolutionFields")]
pub struct MediaResolution {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct ResolutionFields {
    width: u32,
    height: u32,
}

impl TryFrom<ResolutionFields> for MediaResolution {
    type Error = DomainError;

    fn try_from(fields: ResolutionFields) -> Result<Self, Self::Error> {
        Self::new(fields.width, fields.height)
    }
}

impl MediaResolution {
    /// Creates a resolution.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::Validation(format!(
                "resolution must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(self) -> u32 {
        self.height
    }
}

impl fmt::Display for MediaResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A generated artifact. Backends are the only producers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// `file://` URI of the artifact.
    pub uri: String,
    /// MIME type fixed by the output format.
    pub mime_type: String,
    /// Backend-specific details (`mode`, `format`, `command`, `size_bytes`, ...).
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}
