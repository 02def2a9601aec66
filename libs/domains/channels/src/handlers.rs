use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use axum_helpers::{ErrorResponse, Identity, method_not_allowed};
use observability::RouterMetrics;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ChannelError, ChannelResult};
use crate::models::{ChannelQuery, ChannelResponse};
use crate::repository::MembershipRepository;
use crate::service::ChannelService;

pub const TAG: &str = "channel";

/// OpenAPI documentation for the channel endpoint
#[derive(OpenApi)]
#[openapi(
    paths(get_channel),
    components(schemas(ChannelResponse, ErrorResponse)),
    tags((name = TAG, description = "Update channel selection"))
)]
pub struct ApiDoc;

/// Create the channel router. Expects the identity middleware to run first.
pub fn router<R: MembershipRepository + 'static>(service: ChannelService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/channel",
            get(get_channel::<R>).fallback(method_not_allowed),
        )
        .with_state(shared_service)
}

/// Resolve the update channel for the caller's account
#[utoipa::path(
    get,
    path = "/channel",
    tag = TAG,
    params(ChannelQuery),
    responses(
        (status = 200, description = "Channel URL", body = ChannelResponse),
        (status = 400, description = "Missing module or identity", body = ErrorResponse)
    )
)]
async fn get_channel<R: MembershipRepository>(
    State(service): State<Arc<ChannelService<R>>>,
    identity: Identity,
    query: Result<Query<ChannelQuery>, QueryRejection>,
) -> ChannelResult<Json<ChannelResponse>> {
    RouterMetrics::record_request(TAG);

    let Query(query) = query.map_err(|_| ChannelError::MissingModule)?;
    let module = query.module().ok_or(ChannelError::MissingModule)?;
    let channel = service.resolve(module, identity.principal().account()).await;

    Ok(Json(channel.into()))
}
