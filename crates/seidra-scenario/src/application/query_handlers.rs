//! Query handlers for the scenario context.

use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use uuid::Uuid;

use crate::domain::aggregates::Scenario;

/// Retrieves the current snapshot of a scenario.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is unknown.
pub async fn get_scenario_by_id(
    scenario_id: Uuid,
    repo: &dyn RecordRepository<Scenario>,
) -> Result<Scenario, DomainError> {
    repo.read(scenario_id).await
}

/// Lists the current snapshot of every scenario.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn list_scenarios(
    repo: &dyn RecordRepository<Scenario>,
) -> Result<Vec<Scenario>, DomainError> {
    repo.list().await
}
