//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use thiserror::Error;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Event domain errors
#[derive(Debug, Error)]
pub enum EventError {
    /// A required submission field was absent or null
    #[error("missing required field: '{0}'")]
    MissingField(&'static str),

    /// The request body was not a JSON event submission
    #[error("{0}")]
    InvalidBody(String),

    /// A submission field was present but cannot be stored
    #[error("invalid field '{name}': {reason}")]
    InvalidField {
        name: &'static str,
        reason: &'static str,
    },

    /// A listing query parameter could not be used
    #[error("invalid query parameter '{name}': {reason}")]
    InvalidQuery {
        name: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for EventError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.into())
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBody(err.to_string())
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::MissingField(_)
            | EventError::InvalidBody(_)
            | EventError::InvalidField { .. }
            | EventError::InvalidQuery { .. } => AppError::BadRequest(err.to_string()),
            EventError::Database(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
