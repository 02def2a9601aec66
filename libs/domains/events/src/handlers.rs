//! HTTP handlers for events API

use crate::error::EventError;
use crate::models::{Event, EventListQuery, EventSubmission};
use crate::repository::EventRepository;
use crate::service::EventService;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::{ErrorResponse, method_not_allowed};
use observability::RouterMetrics;
use std::sync::Arc;
use tracing::instrument;

/// Events router state
pub type EventsState<R> = Arc<EventService<R>>;

const ENDPOINT: &str = "event";

/// Create the events router
pub fn events_router<R: EventRepository + 'static>() -> Router<EventsState<R>> {
    Router::new().route(
        "/event",
        get(list_events::<R>)
            .post(create_event::<R>)
            .fallback(method_not_allowed),
    )
}

/// List recorded events
#[utoipa::path(
    get,
    path = "/event",
    params(EventListQuery),
    responses(
        (status = 200, description = "Events ordered by start time", body = Vec<Event>),
        (status = 400, description = "Invalid limit or offset", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "event"
)]
#[instrument(skip_all)]
pub async fn list_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
    query: Result<Query<EventListQuery>, QueryRejection>,
) -> Result<Json<Vec<Event>>, EventError> {
    RouterMetrics::record_request(ENDPOINT);

    let Query(query) = query.map_err(|e| EventError::InvalidBody(e.body_text()))?;
    let limit = query.limit()?;
    let offset = query.offset()?;

    let events = state.list(limit, offset).await?;
    Ok(Json(events))
}

/// Record a client update event
#[utoipa::path(
    post,
    path = "/event",
    request_body = EventSubmission,
    responses(
        (status = 201, description = "Event recorded"),
        (status = 400, description = "Malformed body or missing field", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "event"
)]
#[instrument(skip_all, fields(bytes = body.len()))]
pub async fn create_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    body: Bytes,
) -> Result<StatusCode, EventError> {
    RouterMetrics::record_request(ENDPOINT);

    let submission: EventSubmission = serde_json::from_slice(&body)?;
    state.record(submission).await?;
    Ok(StatusCode::CREATED)
}
