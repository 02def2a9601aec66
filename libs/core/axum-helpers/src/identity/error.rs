use axum::http::{StatusCode, header::ToStrError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing X-Rh-Identity header")]
    MissingHeader,

    #[error("invalid X-Rh-Identity header: {0}")]
    NotVisibleAscii(#[from] ToStrError),

    #[error("invalid X-Rh-Identity header: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid X-Rh-Identity header: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A handler asked for the identity on a route without the middleware.
    #[error("identity: no value found in request extensions")]
    MissingValue,

    /// The extensions hold an identity stored under an unexpected type.
    #[error("identity: cannot use {found} as {expected}")]
    TypeMismatch {
        found: &'static str,
        expected: &'static str,
    },
}

impl IdentityError {
    /// Header problems are the caller's fault; extension lookups failing is ours.
    pub fn status(&self) -> StatusCode {
        match self {
            IdentityError::MissingHeader
            | IdentityError::NotVisibleAscii(_)
            | IdentityError::InvalidBase64(_)
            | IdentityError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            IdentityError::MissingValue | IdentityError::TypeMismatch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
