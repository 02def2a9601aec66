use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("missing required parameter: 'module'")]
    MissingModule,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type ChannelResult<T> = Result<T, ChannelError>;

impl From<sqlx::Error> for ChannelError {
    fn from(err: sqlx::Error) -> Self {
        ChannelError::Database(err.into())
    }
}

impl From<ChannelError> for AppError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::MissingModule => AppError::BadRequest(err.to_string()),
            ChannelError::Database(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for ChannelError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
