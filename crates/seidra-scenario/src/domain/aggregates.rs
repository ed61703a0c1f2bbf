//! Scenario record: acts, scenes and their validation rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use seidra_core::error::DomainError;
use seidra_core::record::{CURRENT_SCHEMA_VERSION, VersionedRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scene within an act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier, unique within the scenario by convention.
    pub id: String,
    /// Title. Required.
    pub title: String,
    /// Summary. Required.
    pub summary: String,
    /// Characters appearing in the scene.
    #[serde(default)]
    pub character_ids: Vec<String>,
    /// Arbitrary extra data.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// An act: an ordered, non-empty run of scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    /// Act identifier.
    pub id: String,
    /// Title. Required.
    pub title: String,
    /// Ordered scenes; at least one.
    pub scenes: Vec<Scene>,
    /// Arbitrary extra data.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A stored scenario snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Record identifier.
    pub id: Uuid,
    /// Title. Required.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered acts; at least one.
    pub acts: Vec<Act>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the latest snapshot was written.
    pub modified_at: DateTime<Utc>,
    /// Snapshot schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Scenario {
    /// Builds the first snapshot of a new scenario.
    #[must_use]
    pub fn new(
        id: Uuid,
        title: String,
        description: Option<String>,
        acts: Vec<Act>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            acts,
            created_at: now,
            modified_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Finds a scene by identifier across all acts.
    #[must_use]
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.acts
            .iter()
            .flat_map(|a| a.scenes.iter())
            .find(|s| s.id == scene_id)
    }
}

impl VersionedRecord for Scenario {
    const KIND: &'static str = "scenario";
    const STORE: &'static str = "scenarios";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = now;
    }
}

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_scene(scene: &Scene) -> Result<(), DomainError> {
    require_text("scene title", &scene.title)?;
    require_text("scene summary", &scene.summary)?;
    if scene.character_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(DomainError::Validation(
            "character identifiers must not be empty".into(),
        ));
    }
    Ok(())
}

fn validate_act(act: &Act) -> Result<(), DomainError> {
    require_text("act title", &act.title)?;
    if act.scenes.is_empty() {
        return Err(DomainError::Validation(format!(
            "act '{}' must contain at least one scene",
            act.title
        )));
    }
    act.scenes.iter().try_for_each(validate_scene)
}

/// Checks a scenario outline.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the title is blank, there are no
/// acts, an act has no scenes, a title or summary is blank, or a character
/// identifier is blank.
pub fn validate(title: &str, acts: &[Act]) -> Result<(), DomainError> {
    require_text("scenario title", title)?;
    if acts.is_empty() {
        return Err(DomainError::Validation(
            "scenario must contain at least one act".into(),
        ));
    }
    acts.iter().try_for_each(validate_act)
}
