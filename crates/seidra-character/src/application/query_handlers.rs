//! Query handlers for the character context.

use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use uuid::Uuid;

use crate::domain::aggregates::Character;

/// Retrieves the current snapshot of a character.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is unknown.
pub async fn get_character_by_id(
    character_id: Uuid,
    repo: &dyn RecordRepository<Character>,
) -> Result<Character, DomainError> {
    repo.read(character_id).await
}

/// Lists the current snapshot of every character.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn list_characters(
    repo: &dyn RecordRepository<Character>,
) -> Result<Vec<Character>, DomainError> {
    repo.list().await
}

/// Returns every retained snapshot of a character, oldest first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is unknown.
pub async fn get_character_history(
    character_id: Uuid,
    repo: &dyn RecordRepository<Character>,
) -> Result<Vec<Character>, DomainError> {
    repo.history(character_id).await
}
