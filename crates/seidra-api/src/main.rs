//! Seidra API server entry point.

use std::error::Error;
use std::sync::Arc;

use seidra_api::config::Config;
use seidra_api::error::AppError;
use seidra_api::state::AppState;
use seidra_core::clock::SystemClock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Seidra API server");

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    let app_state = AppState::open(&config, Arc::new(SystemClock))
        .await
        .map_err(AppError::from)?;
    tracing::info!(
        image_models = ?app_state.orchestrator.image_model_names(),
        video_models = ?app_state.orchestrator.video_model_names(),
        default_model = %app_state.default_model_name,
        "backends registered"
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = seidra_api::build_app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::from)?;

    axum::serve(listener, app).await.map_err(AppError::from)?;

    Ok(())
}
