//! Prompt record, its versions and executions.
//!
//! Stored templates are held to a stricter rule than rendering: every
//! placeholder must have a variable when the version is saved. Rendering
//! itself stays permissive.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use seidra_core::error::DomainError;
use seidra_core::record::{CURRENT_SCHEMA_VERSION, VersionedRecord};
use seidra_media::PromptSpec;
use seidra_media::template::placeholders;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One immutable version of a prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVersion {
    /// Template text.
    pub template: String,
    /// Default variables.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    /// Version number, starting at 1.
    pub version: u32,
    /// When this version was saved.
    pub created_at: DateTime<Utc>,
}

impl PromptVersion {
    /// Converts this version into a renderable [`PromptSpec`] tagged with
    /// its version number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the template is blank.
    pub fn to_prompt_spec(&self) -> Result<PromptSpec, DomainError> {
        Ok(PromptSpec::new(self.template.clone())?
            .with_variables(self.variables.clone())
            .with_version(self.version.to_string()))
    }
}

/// A recorded use of a prompt version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptExecution {
    /// Execution identifier.
    pub id: Uuid,
    /// The version that was used.
    pub version: u32,
    /// Free-form context of the use.
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
    /// When the use was recorded.
    pub created_at: DateTime<Utc>,
}

/// A stored prompt snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Record identifier.
    pub id: Uuid,
    /// Prompt name. Required.
    pub name: String,
    /// Versions in order; never empty.
    pub versions: Vec<PromptVersion>,
    /// Executions in order of recording.
    #[serde(default)]
    pub executions: Vec<PromptExecution>,
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

impl Prompt {
    /// Builds a prompt holding version 1 of `template`.
    #[must_use]
    pub fn new(
        id: Uuid,
        name: String,
        template: String,
        variables: BTreeMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            versions: vec![PromptVersion {
                template,
                variables,
                version: 1,
                created_at: now,
            }],
            executions: Vec::new(),
            created_at: now,
            modified_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// The newest version.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored prompt has no
    /// versions.
    pub fn latest_version(&self) -> Result<&PromptVersion, DomainError> {
        self.versions.last().ok_or_else(|| {
            DomainError::Infrastructure(format!("prompt {} has no versions", self.id))
        })
    }

    /// Looks up a version by number.
    #[must_use]
    pub fn version(&self, version: u32) -> Option<&PromptVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Appends version `latest + 1`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the prompt has no versions.
    pub fn push_version(
        &mut self,
        template: String,
        variables: BTreeMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        let next = self.latest_version()?.version + 1;
        self.versions.push(PromptVersion {
            template,
            variables,
            version: next,
            created_at: now,
        });
        Ok(next)
    }

    /// Records a use of `version`, or of the latest version when `None`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the version does not exist.
    pub fn record_execution(
        &mut self,
        version: Option<u32>,
        context: BTreeMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<PromptExecution, DomainError> {
        let target = match version {
            Some(v) => v,
            None => self.latest_version()?.version,
        };
        if self.version(target).is_none() {
            return Err(DomainError::Validation(format!(
                "unknown prompt version {target} for {}",
                self.id
            )));
        }
        let execution = PromptExecution {
            id: Uuid::new_v4(),
            version: target,
            context,
            created_at: now,
        };
        self.executions.push(execution.clone());
        Ok(execution)
    }
}

impl VersionedRecord for Prompt {
    const KIND: &'static str = "prompt";
    const STORE: &'static str = "prompts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = now;
    }
}

/// Checks a template and its variables before they are stored.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the template is blank, a variable
/// key is blank, or a placeholder has no variable.
pub fn validate_template(
    template: &str,
    variables: &BTreeMap<String, Value>,
) -> Result<(), DomainError> {
    if template.trim().is_empty() {
        return Err(DomainError::Validation(
            "prompt template must not be empty".into(),
        ));
    }
    if variables.keys().any(|k| k.trim().is_empty()) {
        return Err(DomainError::Validation(
            "variable names must not be empty".into(),
        ));
    }
    let missing: BTreeSet<String> = placeholders(template)
        .into_iter()
        .filter(|name| !variables.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(DomainError::Validation(format!(
            "missing variables for template: {}",
            missing.into_iter().collect::<Vec<_>>().join(", ")
        )));
    }
    Ok(())
}
