//! Command handlers for the character context.
//!
//! Each handler validates its command, builds the next snapshot and hands it
//! to the repository.

use seidra_core::clock::Clock;
use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::{Character, validate};
use crate::domain::commands::{CreateCharacter, DeleteCharacter, UpdateCharacter};

/// Handles `CreateCharacter`: assigns a fresh identifier and persists the
/// first snapshot.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name, or whatever the
/// repository returns.
pub async fn handle_create_character(
    command: CreateCharacter,
    clock: &dyn Clock,
    repo: &dyn RecordRepository<Character>,
) -> Result<Character, DomainError> {
    validate(&command.profile, &command.history, command.state.as_ref())?;

    let character = Character::new(
        Uuid::new_v4(),
        command.profile,
        command.traits,
        command.history,
        command.state,
        clock.now(),
    );
    let created = repo.create(character).await?;
    info!(character_id = %created.id, name = %created.profile.name, "character created");
    Ok(created)
}

/// Handles `UpdateCharacter`: writes a new snapshot over an existing
/// character, keeping its creation time.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name and
/// `DomainError::NotFound` for an unknown identifier.
pub async fn handle_update_character(
    command: UpdateCharacter,
    repo: &dyn RecordRepository<Character>,
) -> Result<Character, DomainError> {
    validate(&command.profile, &command.history, command.state.as_ref())?;

    let current = repo.read(command.character_id).await?;
    let next = Character {
        profile: command.profile,
        traits: command.traits,
        history: command.history,
        state: command.state,
        ..current
    };
    repo.update(next).await
}

/// Handles `DeleteCharacter`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown identifier.
pub async fn handle_delete_character(
    command: DeleteCharacter,
    repo: &dyn RecordRepository<Character>,
) -> Result<(), DomainError> {
    repo.delete(command.character_id).await?;
    info!(character_id = %command.character_id, "character deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use seidra_core::error::DomainError;
    use seidra_core::repository::RecordRepository;
    use seidra_store::SnapshotRepository;
    use seidra_test_support::{FailingSnapshotStore, FixedClock, MemorySnapshotStore, SteppingClock};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_create_character, handle_delete_character, handle_update_character,
    };
    use crate::domain::aggregates::{Character, CharacterState, HistoryEntry, Profile, Traits};
    use crate::domain::commands::{CreateCharacter, DeleteCharacter, UpdateCharacter};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_owned(),
            description: "A lighthouse keeper".to_owned(),
            narrative_voice: Some("dry".to_owned()),
            metadata: BTreeMap::new(),
        }
    }

    fn create_command(name: &str) -> CreateCharacter {
        CreateCharacter {
            profile: profile(name),
            traits: Traits {
                traits: vec!["stubborn".to_owned()],
                relations: vec![],
                tags: vec!["coast".to_owned()],
            },
            history: vec![HistoryEntry {
                title: "The storm".to_owned(),
                content: "Kept the light burning.".to_owned(),
                date: None,
            }],
            state: None,
        }
    }

    async fn memory_repo() -> SnapshotRepository<Character> {
        SnapshotRepository::open(
            Arc::new(MemorySnapshotStore::new()),
            Arc::new(SteppingClock::starting_at(fixed_now() + Duration::minutes(1))),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_handle_create_character_persists_first_snapshot() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;

        // Act
        let created = handle_create_character(create_command("Maren"), &clock, &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(created.profile.name, "Maren");
        assert_eq!(created.created_at, fixed_now());
        assert_eq!(created.modified_at, fixed_now());
        assert_eq!(created.schema_version, 1);
        assert_eq!(repo.read(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_handle_create_character_rejects_blank_name() {
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;

        let result = handle_create_character(create_command("   "), &clock, &repo).await;

        match result {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "character name must not be empty");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_create_character_propagates_store_failure() {
        let clock = FixedClock(fixed_now());
        let repo = SnapshotRepository::<Character>::open(
            Arc::new(FailingSnapshotStore),
            Arc::new(FixedClock(fixed_now())),
        )
        .await
        .unwrap();

        let result = handle_create_character(create_command("Maren"), &clock, &repo).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_update_character_keeps_identity_and_creation_time() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;
        let created = handle_create_character(create_command("Maren"), &clock, &repo)
            .await
            .unwrap();

        // Act
        let updated = handle_update_character(
            UpdateCharacter {
                character_id: created.id,
                profile: profile("Maren Vell"),
                traits: created.traits.clone(),
                history: created.history.clone(),
                state: Some(CharacterState {
                    status: "wounded".to_owned(),
                    location: Some("Cape Verity".to_owned()),
                    emotional_state: None,
                    variables: BTreeMap::new(),
                }),
            },
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.modified_at > created.modified_at);
        assert_eq!(updated.profile.name, "Maren Vell");
        assert_eq!(repo.history(created.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_handle_update_character_unknown_id_is_not_found() {
        let repo = memory_repo().await;
        let command = UpdateCharacter {
            character_id: Uuid::new_v4(),
            profile: profile("Nobody"),
            traits: Traits::default(),
            history: vec![],
            state: None,
        };

        let result = handle_update_character(command, &repo).await;

        match result {
            Err(DomainError::NotFound { kind, .. }) => assert_eq!(kind, "character"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_delete_character_removes_record() {
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;
        let created = handle_create_character(create_command("Maren"), &clock, &repo)
            .await
            .unwrap();

        handle_delete_character(DeleteCharacter { character_id: created.id }, &repo)
            .await
            .unwrap();

        assert!(matches!(
            repo.read(created.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
