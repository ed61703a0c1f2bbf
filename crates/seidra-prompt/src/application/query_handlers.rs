//! Query handlers for the prompt library.

use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use seidra_media::PromptSpec;
use uuid::Uuid;

use crate::domain::aggregates::Prompt;

/// Retrieves the current snapshot of a prompt.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is unknown.
pub async fn get_prompt_by_id(
    prompt_id: Uuid,
    repo: &dyn RecordRepository<Prompt>,
) -> Result<Prompt, DomainError> {
    repo.read(prompt_id).await
}

/// Lists the current snapshot of every prompt.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn list_prompts(
    repo: &dyn RecordRepository<Prompt>,
) -> Result<Vec<Prompt>, DomainError> {
    repo.list().await
}

/// Resolves a stored version (the latest when `version` is `None`) into a
/// renderable [`PromptSpec`].
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown prompt and
/// `DomainError::Validation` for an unknown version.
pub async fn get_prompt_spec(
    prompt_id: Uuid,
    version: Option<u32>,
    repo: &dyn RecordRepository<Prompt>,
) -> Result<PromptSpec, DomainError> {
    let prompt = repo.read(prompt_id).await?;
    let stored = match version {
        Some(v) => prompt.version(v).ok_or_else(|| {
            DomainError::Validation(format!("unknown prompt version {v} for {prompt_id}"))
        })?,
        None => prompt.latest_version()?,
    };
    stored.to_prompt_spec()
}
