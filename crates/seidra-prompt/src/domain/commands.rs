//! Commands for the prompt library.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

/// Command to create a prompt at version 1.
#[derive(Debug, Clone)]
pub struct CreatePrompt {
    /// Prompt name.
    pub name: String,
    /// Template text.
    pub template: String,
    /// Default variables; must cover every placeholder.
    pub variables: BTreeMap<String, Value>,
}

/// Command to save a new version of an existing prompt.
#[derive(Debug, Clone)]
pub struct UpdatePrompt {
    /// The prompt identifier.
    pub prompt_id: Uuid,
    /// Template text of the new version.
    pub template: String,
    /// Variables of the new version.
    pub variables: BTreeMap<String, Value>,
}

/// Command to record a use of a prompt version.
#[derive(Debug, Clone)]
pub struct RecordExecution {
    /// The prompt identifier.
    pub prompt_id: Uuid,
    /// Version used; the latest when `None`.
    pub version: Option<u32>,
    /// Free-form context.
    pub context: BTreeMap<String, Value>,
}
