//! Command handlers for the scenario context.

use seidra_core::clock::Clock;
use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::{Scenario, validate};
use crate::domain::commands::{CreateScenario, UpdateScenario};

/// Handles `CreateScenario`: validates the outline and persists the first
/// snapshot under a fresh identifier.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an invalid outline, or whatever the
/// repository returns.
pub async fn handle_create_scenario(
    command: CreateScenario,
    clock: &dyn Clock,
    repo: &dyn RecordRepository<Scenario>,
) -> Result<Scenario, DomainError> {
    validate(&command.title, &command.acts)?;

    let scenario = Scenario::new(
        Uuid::new_v4(),
        command.title,
        command.description,
        command.acts,
        clock.now(),
    );
    let created = repo.create(scenario).await?;
    info!(scenario_id = %created.id, acts = created.acts.len(), "scenario created");
    Ok(created)
}

/// Handles `UpdateScenario`: replaces the outline of an existing scenario.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an invalid outline and
/// `DomainError::NotFound` for an unknown identifier.
pub async fn handle_update_scenario(
    command: UpdateScenario,
    repo: &dyn RecordRepository<Scenario>,
) -> Result<Scenario, DomainError> {
    validate(&command.title, &command.acts)?;

    let current = repo.read(command.scenario_id).await?;
    repo.update(Scenario {
        title: command.title,
        description: command.description,
        acts: command.acts,
        ..current
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use seidra_core::error::DomainError;
    use seidra_core::repository::RecordRepository;
    use seidra_store::SnapshotRepository;
    use seidra_test_support::{FixedClock, MemorySnapshotStore, SteppingClock};
    use uuid::Uuid;

    use crate::application::command_handlers::{handle_create_scenario, handle_update_scenario};
    use crate::domain::aggregates::{Act, Scenario, Scene};
    use crate::domain::commands::{CreateScenario, UpdateScenario};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn acts() -> Vec<Act> {
        vec![Act {
            id: "act-1".to_owned(),
            title: "Landfall".to_owned(),
            scenes: vec![Scene {
                id: "scene-1".to_owned(),
                title: "Docks".to_owned(),
                summary: "The ship lands at dawn".to_owned(),
                character_ids: vec!["maren".to_owned()],
                metadata: BTreeMap::new(),
            }],
            metadata: BTreeMap::new(),
        }]
    }

    async fn memory_repo() -> SnapshotRepository<Scenario> {
        SnapshotRepository::open(
            Arc::new(MemorySnapshotStore::new()),
            Arc::new(SteppingClock::starting_at(fixed_now() + Duration::minutes(1))),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_handle_create_scenario_persists_outline() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;
        let command = CreateScenario {
            title: "The Lighthouse".to_owned(),
            description: Some("A coastal mystery".to_owned()),
            acts: acts(),
        };

        // Act
        let created = handle_create_scenario(command, &clock, &repo).await.unwrap();

        // Assert
        let stored = repo.read(created.id).await.unwrap();
        assert_eq!(stored.title, "The Lighthouse");
        assert_eq!(stored.created_at, fixed_now());
        assert_eq!(stored.scene("scene-1").unwrap().summary, "The ship lands at dawn");
    }

    #[tokio::test]
    async fn test_handle_create_scenario_rejects_act_without_scenes() {
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;
        let mut outline = acts();
        outline[0].scenes.clear();

        let result = handle_create_scenario(
            CreateScenario {
                title: "Empty".to_owned(),
                description: None,
                acts: outline,
            },
            &clock,
            &repo,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_update_scenario_appends_snapshot() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = memory_repo().await;
        let created = handle_create_scenario(
            CreateScenario {
                title: "Draft".to_owned(),
                description: None,
                acts: acts(),
            },
            &clock,
            &repo,
        )
        .await
        .unwrap();

        // Act
        let updated = handle_update_scenario(
            UpdateScenario {
                scenario_id: created.id,
                title: "Final".to_owned(),
                description: None,
                acts: acts(),
            },
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.modified_at > created.modified_at);
        assert_eq!(repo.history(created.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_handle_update_scenario_unknown_id_is_not_found() {
        let repo = memory_repo().await;

        let result = handle_update_scenario(
            UpdateScenario {
                scenario_id: Uuid::new_v4(),
                title: "Ghost".to_owned(),
                description: None,
                acts: acts(),
            },
            &repo,
        )
        .await;

        match result {
            Err(DomainError::NotFound { kind, .. }) => assert_eq!(kind, "scenario"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
