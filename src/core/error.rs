use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Cycle detected: {0}")]
    Cycle(String),

    #[error("Dependents exist: {0}")]
    DependentsExist(String),

    #[error("Stale snapshot: {0}")]
    StaleSnapshot(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::ParentNotFound(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::Cycle(ref msg) => (StatusCode::CONFLICT, msg.clone(), Some(vec![msg.clone()])),
            AppError::DependentsExist(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::StaleSnapshot(ref msg) => {
                tracing::warn!("Stale category snapshot: {}", msg);
                (StatusCode::CONFLICT, msg.clone(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
