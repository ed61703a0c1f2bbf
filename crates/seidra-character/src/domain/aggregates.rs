//! Character record and its parts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use seidra_core::error::DomainError;
use seidra_core::record::{CURRENT_SCHEMA_VERSION, VersionedRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who the character is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name. Required.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// How the character speaks in narration.
    #[serde(default)]
    pub narrative_voice: Option<String>,
    /// Arbitrary extra data.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Personality traits, relations and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traits {
    /// Personality traits.
    #[serde(default)]
    pub traits: Vec<String>,
    /// Relations to other characters.
    #[serde(default)]
    pub relations: Vec<String>,
    /// Free tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One event in a character's past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Short title.
    pub title: String,
    /// What happened.
    pub content: String,
    /// In-world date, free text.
    #[serde(default)]
    pub date: Option<String>,
}

/// Where the character stands right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Status label (`alive`, `missing`, ...).
    pub status: String,
    /// Current location.
    #[serde(default)]
    pub location: Option<String>,
    /// Current emotional state.
    #[serde(default)]
    pub emotional_state: Option<String>,
    /// Story variables.
    #[serde(default)]
    pub variables: BTreeMap<String, serde_json::Value>,
}

/// A stored character snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Record identifier.
    pub id: Uuid,
    /// Profile.
    pub profile: Profile,
    /// Traits.
    #[serde(default)]
    pub traits: Traits,
    /// Ordered history entries.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Optional current state.
    #[serde(default)]
    pub state: Option<CharacterState>,
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

impl Character {
    /// Builds the first snapshot of a new character.
    #[must_use]
    pub fn new(
        id: Uuid,
        profile: Profile,
        traits: Traits,
        history: Vec<HistoryEntry>,
        state: Option<CharacterState>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile,
            traits,
            history,
            state,
            created_at: now,
            modified_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

impl VersionedRecord for Character {
    const KIND: &'static str = "character";
    const STORE: &'static str = "characters";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = now;
    }
}

/// Checks the parts of a character that callers supply.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name, a history entry title or a
/// state status is blank.
pub fn validate(
    profile: &Profile,
    history: &[HistoryEntry],
    state: Option<&CharacterState>,
) -> Result<(), DomainError> {
    if profile.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "character name must not be empty".into(),
        ));
    }
    if history.iter().any(|e| e.title.trim().is_empty()) {
        return Err(DomainError::Validation(
            "history entry title must not be empty".into(),
        ));
    }
    if state.is_some_and(|s| s.status.trim().is_empty()) {
        return Err(DomainError::Validation(
            "character status must not be empty".into(),
        ));
    }
    Ok(())
}
