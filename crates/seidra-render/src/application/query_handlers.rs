//! Query handlers for render jobs.

use seidra_core::error::DomainError;
use seidra_core::repository::RecordRepository;
use uuid::Uuid;

use crate::domain::aggregates::RenderJob;

/// Retrieves the current snapshot of a render job.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is unknown.
pub async fn get_render_by_id(
    render_id: Uuid,
    repo: &dyn RecordRepository<RenderJob>,
) -> Result<RenderJob, DomainError> {
    repo.read(render_id).await
}

/// Lists every render job, oldest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn list_renders(
    repo: &dyn RecordRepository<RenderJob>,
) -> Result<Vec<RenderJob>, DomainError> {
    let mut jobs = repo.list().await?;
    jobs.sort_by_key(|job| job.created_at);
    Ok(jobs)
}
