//! Command handlers for the prompt library.

use seidra_core::clock::Clock;
use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::{Prompt, PromptExecution, validate_template};
use crate::domain::commands::{CreatePrompt, RecordExecution, UpdatePrompt};

/// Handles `CreatePrompt`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name, a blank template, a
/// blank variable key or an uncovered placeholder.
pub async fn handle_create_prompt(
    command: CreatePrompt,
    clock: &dyn Clock,
    repo: &dyn RecordRepository<Prompt>,
) -> Result<Prompt, DomainError> {
    if command.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "prompt name must not be empty".into(),
        ));
    }
    validate_template(&command.template, &command.variables)?;

    let prompt = Prompt::new(
        Uuid::new_v4(),
        command.name,
        command.template,
        command.variables,
        clock.now(),
    );
    let created = repo.create(prompt).await?;
    info!(prompt_id = %created.id, name = %created.name, "prompt created");
    Ok(created)
}

/// Handles `UpdatePrompt`: appends version `latest + 1`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an invalid template and
/// `DomainError::NotFound` for an unknown identifier.
pub async fn handle_update_prompt(
    command: UpdatePrompt,
    clock: &dyn Clock,
    repo: &dyn RecordRepository<Prompt>,
) -> Result<Prompt, DomainError> {
    validate_template(&command.template, &command.variables)?;

    let mut prompt = repo.read(command.prompt_id).await?;
    let version = prompt.push_version(command.template, command.variables, clock.now())?;
    let updated = repo.update(prompt).await?;
    info!(prompt_id = %updated.id, version, "prompt version saved");
    Ok(updated)
}

/// Handles `RecordExecution`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an unknown version and
/// `DomainError::NotFound` for an unknown identifier.
pub async fn handle_record_execution(
    command: RecordExecution,
    clock: &dyn Clock,
    repo: &dyn RecordRepository<Prompt>,
) -> Result<PromptExecution, DomainError> {
    let mut prompt = repo.read(command.prompt_id).await?;
    let execution = prompt.record_execution(command.version, command.context, clock.now())?;
    repo.update(prompt).await?;
    info!(
        prompt_id = %command.prompt_id,
        version = execution.version,
        execution_id = %execution.id,
        "prompt execution recorded"
    );
    Ok(execution)
}
