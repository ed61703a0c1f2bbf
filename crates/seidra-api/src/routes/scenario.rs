//! Routes for scenario records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use seidra_scenario::application::{command_handlers, query_handlers};
use seidra_scenario::domain::aggregates::{Act, Scenario};
use seidra_scenario::domain::commands;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for POST / and PUT /{id}.
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    /// Scenario title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered acts; at least one.
    pub acts: Vec<Act>,
}

/// POST /
#[instrument(skip(state, request), fields(title = %request.title))]
async fn create_scenario(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScenarioRequest>,
) -> Result<(StatusCode, Json<Scenario>), ApiError> {
    let command = commands::CreateScenario {
        title: request.title,
        description: request.description,
        acts: request.acts,
    };

    info!("handling create_scenario command");

    let scenario = command_handlers::handle_create_scenario(
        command,
        state.clock.as_ref(),
        &*state.repositories.scenarios,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(scenario)))
}

/// GET /
async fn list_scenarios(State(state): State<AppState>) -> Result<Json<Vec<Scenario>>, ApiError> {
    let scenarios = query_handlers::list_scenarios(&*state.repositories.scenarios).await?;
    Ok(Json(scenarios))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> Result<Json<Scenario>, ApiError> {
    let scenario =
        query_handlers::get_scenario_by_id(scenario_id, &*state.repositories.scenarios).await?;
    Ok(Json(scenario))
}

/// PUT /{id}
#[instrument(skip(state, request))]
async fn update_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    AppJson(request): AppJson<ScenarioRequest>,
) -> Result<Json<Scenario>, ApiError> {
    let command = commands::UpdateScenario {
        scenario_id,
        title: request.title,
        description: request.description,
        acts: request.acts,
    };

    info!("handling update_scenario command");

    let scenario =
        command_handlers::handle_update_scenario(command, &*state.repositories.scenarios).await?;
    Ok(Json(scenario))
}

/// Returns the router for scenario records.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scenarios).post(create_scenario))
        .route("/{id}", get(get_scenario).put(update_scenario))
}
