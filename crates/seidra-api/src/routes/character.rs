//! Routes for character records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use seidra_character::application::{command_handlers, query_handlers};
use seidra_character::domain::aggregates::{Character, CharacterState, HistoryEntry, Profile, Traits};
use seidra_character::domain::commands;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for POST / and PUT /{id}.
#[derive(Debug, Deserialize)]
pub struct CharacterRequest {
    /// Profile; the name is required.
    pub profile: Profile,
    /// Traits, relations and tags.
    #[serde(default)]
    pub traits: Traits,
    /// Ordered history entries.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Optional current state.
    #[serde(default)]
    pub state: Option<CharacterState>,
}

/// POST /
#[instrument(skip(state, request), fields(name = %request.profile.name))]
async fn create_character(
    State(state): State<AppState>,
    AppJson(request): AppJson<CharacterRequest>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let command = commands::CreateCharacter {
        profile: request.profile,
        traits: request.traits,
        history: request.history,
        state: request.state,
    };

    info!("handling create_character command");

    let character = command_handlers::handle_create_character(
        command,
        state.clock.as_ref(),
        &*state.repositories.characters,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /
async fn list_characters(State(state): State<AppState>) -> Result<Json<Vec<Character>>, ApiError> {
    let characters = query_handlers::list_characters(&*state.repositories.characters).await?;
    Ok(Json(characters))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_character(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    let character =
        query_handlers::get_character_by_id(character_id, &*state.repositories.characters).await?;
    Ok(Json(character))
}

/// PUT /{id}
#[instrument(skip(state, request))]
async fn update_character(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
    AppJson(request): AppJson<CharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let command = commands::UpdateCharacter {
        character_id,
        profile: request.profile,
        traits: request.traits,
        history: request.history,
        state: request.state,
    };

    info!("handling update_character command");

    let character =
        command_handlers::handle_update_character(command, &*state.repositories.characters)
            .await?;
    Ok(Json(character))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_character(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    command_handlers::handle_delete_character(
        commands::DeleteCharacter { character_id },
        &*state.repositories.characters,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /{id}/history
#[instrument(skip(state))]
async fn get_character_history(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
) -> Result<Json<Vec<Character>>, ApiError> {
    let snapshots =
        query_handlers::get_character_history(character_id, &*state.repositories.characters)
            .await?;
    Ok(Json(snapshots))
}

/// Returns the router for character records.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_characters).post(create_character))
        .route(
            "/{id}",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/{id}/history", get(get_character_history))
}
