//! Registered backend names.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Backend names per media kind.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    /// Image backends, sorted.
    pub image: Vec<String>,
    /// Video backends, sorted.
    pub video: Vec<String>,
    /// Backend used when a render request names none.
    pub default: String,
}

/// GET /
async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        image: state.orchestrator.image_model_names(),
        video: state.orchestrator.video_model_names(),
        default: state.default_model_name.clone(),
    })
}

/// Returns the router for backend listings.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_models))
}
