//! Seidra — HTTP API.
//!
//! Axum transport over the record contexts and the media orchestrator.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full route tree over `state`.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/characters", routes::character::router())
        .nest("/api/v1/scenarios", routes::scenario::router())
        .nest("/api/v1/prompts", routes::prompt::router())
        .nest("/api/v1/renders", routes::render::router())
        .nest("/api/v1/models", routes::model::router())
        .with_state(state)
}
