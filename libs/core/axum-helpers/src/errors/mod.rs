pub mod handlers;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::identity::IdentityError;

/// One entry of the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorObject {
    /// Canonical reason phrase of the HTTP status, e.g. `Bad Request`
    pub status: String,
    /// Human-readable description of the failure
    pub title: String,
}

/// Error body returned by every 4xx/5xx response.
///
/// ```json
/// {"errors":[{"status":"Bad Request","title":"missing required field: 'exit'"}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorObject {
                status: status.canonical_reason().unwrap_or("Unknown").to_string(),
                title: title.into(),
            }],
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own errors into this type at the handler
/// boundary; the message becomes the envelope `title`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    InternalServerError(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Identity(e) => e.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let title = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %title, "Request failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %title, "Request rejected");
        }

        error_response(status, title)
    }
}

/// Render the error envelope for `status` with `title`.
pub fn error_response(status: StatusCode, title: impl Into<String>) -> Response {
    let mut response = (status, Json(ErrorResponse::new(status, title))).into_response();
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}
