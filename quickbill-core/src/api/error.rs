use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use super::types::ValidationErrorBody;
use super::validation::ValidationError;
use crate::error::StoreError;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invoice {0} not found")]
    InvoiceNotFound(Uuid),

    #[error("path id {path} does not match invoice id {body}")]
    IdMismatch { path: Uuid, body: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvoiceNotFound(_) => StatusCode::NOT_FOUND.into_response(),
            ApiError::IdMismatch { .. } => {
                warn!("{}", self);
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ApiError::Validation(ValidationError(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorBody { errors }),
            )
                .into_response(),
            ApiError::Store(_) => {
                error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
