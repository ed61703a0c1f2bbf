//! Routes for render jobs.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use seidra_core::error::DomainError;
use seidra_media::{
    ImageConfigParams, ImageGenerationConfig, MediaKind, PromptSpec, SceneSpec, VideoConfigParams,
    VideoGenerationConfig,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use seidra_prompt::application::command_handlers::handle_record_execution;
use seidra_prompt::application::query_handlers::get_prompt_spec;
use seidra_prompt::domain::commands::RecordExecution;
use seidra_render::application::{command_handlers, query_handlers};
use seidra_render::domain::aggregates::{RenderConfig, RenderJob};
use seidra_render::domain::commands;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for POST /.
///
/// The prompt is given inline or as a stored prompt reference, never both.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// `image` or `video`.
    #[serde(rename = "type")]
    pub media_kind: MediaKind,
    /// Scene to render.
    pub scene: SceneSpec,
    /// Inline prompt.
    #[serde(default)]
    pub prompt: Option<PromptSpec>,
    /// Stored prompt to render with.
    #[serde(default)]
    pub prompt_id: Option<Uuid>,
    /// Version of the stored prompt; the latest when absent.
    #[serde(default)]
    pub prompt_version: Option<u32>,
    /// Required for image renders.
    #[serde(default)]
    pub image_config: Option<ImageConfigParams>,
    /// Required for video renders.
    #[serde(default)]
    pub video_config: Option<VideoConfigParams>,
    /// Backend name; the configured default when absent.
    #[serde(default)]
    pub model_name: Option<String>,
}

fn render_config(
    media_kind: MediaKind,
    image_config: Option<ImageConfigParams>,
    video_config: Option<VideoConfigParams>,
) -> Result<RenderConfig, DomainError> {
    let missing = || {
        DomainError::Validation(format!(
            "{media_kind}_config is required for a {media_kind} render"
        ))
    };
    Ok(match media_kind {
        MediaKind::Image => RenderConfig::Image(ImageGenerationConfig::try_from(
            image_config.ok_or_else(missing)?,
        )?),
        MediaKind::Video => RenderConfig::Video(VideoGenerationConfig::try_from(
            video_config.ok_or_else(missing)?,
        )?),
    })
}

/// POST /
#[instrument(skip(state, request), fields(kind = %request.media_kind, scene = %request.scene.identifier))]
async fn start_render(
    State(state): State<AppState>,
    AppJson(request): AppJson<RenderRequest>,
) -> Result<(StatusCode, Json<RenderJob>), ApiError> {
    let config = render_config(
        request.media_kind,
        request.image_config,
        request.video_config,
    )?;
    let prompt = match (request.prompt, request.prompt_id) {
        (Some(prompt), None) => prompt,
        (None, Some(prompt_id)) => {
            get_prompt_spec(prompt_id, request.prompt_version, &*state.repositories.prompts)
                .await?
        }
        (Some(_), Some(_)) => {
            return Err(DomainError::Validation(
                "provide either prompt or prompt_id, not both".into(),
            )
            .into());
        }
        (None, None) => {
            return Err(DomainError::Validation("prompt or prompt_id is required".into()).into());
        }
    };
    let command = commands::StartRender {
        scene: request.scene,
        prompt,
        config,
        model_name: request
            .model_name
            .unwrap_or_else(|| state.default_model_name.clone()),
    };

    info!(model = %command.model_name, "handling start_render command");

    let job = command_handlers::handle_render(
        command,
        state.clock.as_ref(),
        &state.orchestrator,
        &*state.repositories.renders,
    )
    .await?;

    if let Some(prompt_id) = request.prompt_id {
        let version = job.prompt.version().and_then(|v| v.parse().ok());
        let recorded = handle_record_execution(
            RecordExecution {
                prompt_id,
                version,
                context: BTreeMap::from([
                    ("render_id".to_owned(), json!(job.id)),
                    ("scene".to_owned(), json!(job.scene.identifier)),
                ]),
            },
            state.clock.as_ref(),
            &*state.repositories.prompts,
        )
        .await;
        // The job is already stored as completed.
        if let Err(err) = recorded {
            warn!(
                %prompt_id,
                render_id = %job.id,
                error = %err,
                "failed to record prompt execution"
            );
        }
    }

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /
async fn list_renders(State(state): State<AppState>) -> Result<Json<Vec<RenderJob>>, ApiError> {
    let jobs = query_handlers::list_renders(&*state.repositories.renders).await?;
    Ok(Json(jobs))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_render(
    State(state): State<AppState>,
    Path(render_id): Path<Uuid>,
) -> Result<Json<RenderJob>, ApiError> {
    let job = query_handlers::get_render_by_id(render_id, &*state.repositories.renders).await?;
    Ok(Json(job))
}

/// Returns the router for render jobs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_renders).post(start_render))
        .route("/{id}", get(get_render))
}
