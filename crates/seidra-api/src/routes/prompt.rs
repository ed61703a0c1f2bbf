//! Routes for the prompt library.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use seidra_prompt::application::{command_handlers, query_handlers};
use seidra_prompt::domain::aggregates::{Prompt, PromptExecution};
use seidra_prompt::domain::commands;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreatePromptRequest {
    /// Prompt name.
    pub name: String,
    /// Template of version 1.
    pub template: String,
    /// Variables of version 1.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

/// Request body for PUT /{id}.
#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    /// Template of the new version.
    pub template: String,
    /// Variables of the new version.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

/// Request body for POST /{id}/executions.
#[derive(Debug, Default, Deserialize)]
pub struct RecordExecutionRequest {
    /// Version used; the latest when absent.
    #[serde(default)]
    pub version: Option<u32>,
    /// Free-form context.
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

/// POST /
#[instrument(skip(state, request), fields(name = %request.name))]
async fn create_prompt(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePromptRequest>,
) -> Result<(StatusCode, Json<Prompt>), ApiError> {
    let command = commands::CreatePrompt {
        name: request.name,
        template: request.template,
        variables: request.variables,
    };

    info!("handling create_prompt command");

    let prompt = command_handlers::handle_create_prompt(
        command,
        state.clock.as_ref(),
        &*state.repositories.prompts,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(prompt)))
}

/// GET /
async fn list_prompts(State(state): State<AppState>) -> Result<Json<Vec<Prompt>>, ApiError> {
    let prompts = query_handlers::list_prompts(&*state.repositories.prompts).await?;
    Ok(Json(prompts))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
) -> Result<Json<Prompt>, ApiError> {
    let prompt = query_handlers::get_prompt_by_id(prompt_id, &*state.repositories.prompts).await?;
    Ok(Json(prompt))
}

/// PUT /{id}
#[instrument(skip(state, request))]
async fn update_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
    AppJson(request): AppJson<UpdatePromptRequest>,
) -> Result<Json<Prompt>, ApiError> {
    let command = commands::UpdatePrompt {
        prompt_id,
        template: request.template,
        variables: request.variables,
    };

    info!("handling update_prompt command");

    let prompt = command_handlers::handle_update_prompt(
        command,
        state.clock.as_ref(),
        &*state.repositories.prompts,
    )
    .await?;
    Ok(Json(prompt))
}

/// POST /{id}/executions
#[instrument(skip(state, request), fields(version = ?request.version))]
async fn record_execution(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
    AppJson(request): AppJson<RecordExecutionRequest>,
) -> Result<(StatusCode, Json<PromptExecution>), ApiError> {
    let command = commands::RecordExecution {
        prompt_id,
        version: request.version,
        context: request.context,
    };

    let execution = command_handlers::handle_record_execution(
        command,
        state.clock.as_ref(),
        &*state.repositories.prompts,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(execution)))
}

/// Returns the router for the prompt library.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_prompts).post(create_prompt))
        .route("/{id}", get(get_prompt).put(update_prompt))
        .route("/{id}/executions", post(record_execution))
}
