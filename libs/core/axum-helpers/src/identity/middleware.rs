use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{IDENTITY_HEADER, IdentityError, Principal, XRhIdentity};
use crate::errors::AppError;

/// Decode `X-Rh-Identity` and attach it to the request.
///
/// Requests without a well-formed header are answered with 400 and never
/// reach the inner service.
///
/// ```ignore
/// let api = Router::new()
///     .route("/channel", get(handler))
///     .layer(axum::middleware::from_fn(identity_middleware));
/// ```
pub async fn identity_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(IDENTITY_HEADER)
        .map(|v| v.to_str())
        .transpose()
        .map_err(IdentityError::from)?
        .filter(|v| !v.is_empty())
        .ok_or(IdentityError::MissingHeader)?;

    let identity = XRhIdentity::decode(header).inspect_err(|e| {
        tracing::debug!(error = %e, "Rejecting malformed identity header");
    })?;

    request.extensions_mut().insert(Arc::new(identity));
    Ok(next.run(request).await)
}

/// Extractor for the identity stored by [`identity_middleware`].
///
/// Fails with a 500 when the middleware did not run
/// ([`IdentityError::MissingValue`]) or when the extensions hold the identity
/// under a different type ([`IdentityError::TypeMismatch`]).
#[derive(Debug, Clone)]
pub struct Identity(pub Arc<XRhIdentity>);

impl Identity {
    pub fn principal(&self) -> &Principal {
        &self.0.identity
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Arc<XRhIdentity>>() {
            return Ok(Identity(identity.clone()));
        }

        let err = if parts.extensions.get::<XRhIdentity>().is_some() {
            IdentityError::TypeMismatch {
                found: std::any::type_name::<XRhIdentity>(),
                expected: std::any::type_name::<Arc<XRhIdentity>>(),
            }
        } else {
            IdentityError::MissingValue
        };
        tracing::error!(error = %err, "Identity unavailable to handler");
        Err(err.into())
    }
}
