use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    HealthCheckFuture, access_log, identity_middleware, method_not_allowed, not_found,
    ping_router, propagate_request_id_layer, run_health_checks, set_request_id_layer,
};
use database::{Store, sqlite::check_health};
use domain_channels::{ChannelService, SqliteMembershipRepository};
use domain_events::events_router;
use observability::metrics_middleware;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::openapi;
use crate::state::AppState;

/// Full application router.
///
/// Every API root gets the same endpoints behind the request chain, outermost
/// first: metrics, request id, access log, identity. `/ping`, `/ready` and the
/// OpenAPI document are served without it.
pub fn app(state: &AppState, api: &ApiConfig) -> Router {
    let roots = api.roots();
    let endpoints = api_routes(state);

    let app = roots
        .iter()
        .fold(Router::new(), |app, root| app.nest(root, endpoints.clone()));

    app.merge(ping_router())
        .merge(ready_router(state.store.clone()))
        .merge(docs_router(openapi::document(&roots)))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

/// Endpoints mounted under each API root, with the request chain applied.
fn api_routes(state: &AppState) -> Router {
    let channels = ChannelService::new(SqliteMembershipRepository::new(state.store.clone()));

    Router::new()
        .merge(domain_channels::handlers::router(channels))
        .merge(events_router().with_state(state.events.clone()))
        .fallback(not_found)
        .layer(middleware::from_fn(identity_middleware))
        .layer(middleware::from_fn(access_log))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
        .layer(middleware::from_fn(metrics_middleware))
}

fn ready_router(store: Store) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(store)
}

/// Readiness probe: 200 while the store answers `SELECT 1`, 503 otherwise.
async fn ready_handler(State(store): State<Store>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            check_health(&store)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

fn docs_router(doc: utoipa::openapi::OpenApi) -> Router {
    Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(Arc::new(doc))
}

async fn openapi_json(
    State(doc): State<Arc<utoipa::openapi::OpenApi>>,
) -> Json<utoipa::openapi::OpenApi> {
    Json(doc.as_ref().clone())
}
