//! Seidra — API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seidra_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A record store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::BackendNotFound { .. } => (StatusCode::BAD_REQUEST, "backend_not_found"),
            DomainError::Execution { .. } => (StatusCode::BAD_GATEWAY, "execution_error"),
            DomainError::OutputMissing { .. } => (StatusCode::BAD_GATEWAY, "output_missing"),
            DomainError::SizeExceeded { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "size_exceeded")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::not_found("character", "abc")),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_backend_not_found_maps_to_400() {
        assert_eq!(
            status_of(DomainError::BackendNotFound {
                media_kind: "image",
                name: "sdxl".into(),
                available: vec!["stub".into()],
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_command_failures_map_to_502() {
        assert_eq!(
            status_of(DomainError::Execution {
                command: "gen".into(),
                exit_code: Some(2),
                stderr: "boom".into(),
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(DomainError::OutputMissing {
                path: PathBuf::from("/tmp/image_s1.png"),
                command: "gen".into(),
            }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_size_exceeded_maps_to_422() {
        assert_eq!(
            status_of(DomainError::SizeExceeded {
                media_kind: "video",
                path: PathBuf::from("/tmp/video_s1.mp4"),
                size_bytes: 11,
                max_size_bytes: 10,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
