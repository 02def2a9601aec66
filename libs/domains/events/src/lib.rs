//! Events Domain
//!
//! Records client update attempts reported by `insights-core` and serves
//! them back in start-time order:
//! - SQLite for event persistence
//! - Prometheus counters/histograms for every recorded event
//! - an optional best-effort mirror onto a message bus
//! - an hourly retention sweep that drops events older than 30 days
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Event Flow                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  HTTP POST /event ─┬─► SQLite (events table)                │
//! │                    │                                        │
//! │                    ├─► metrics (count, client duration)     │
//! │                    │                                        │
//! │                    └─► OutboundQueue ─► Publisher (NATS)    │
//! │                                                             │
//! │  RetentionSweeper ──(hourly)──► DELETE started_at < now-30d │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use utoipa::OpenApi;

mod error;
mod handlers;
mod models;
mod repository;
mod service;
mod sqlite;
mod sweeper;

pub use error::{EventError, Result};
pub use handlers::{EventsState, events_router};
pub use models::{Event, EventListQuery, EventSubmission, NewEvent, RowLimit};
pub use repository::EventRepository;
pub use service::EventService;
pub use sqlite::SqliteEventRepository;
pub use sweeper::{RETENTION_HORIZON, RetentionSweeper, SWEEP_INTERVAL};

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(handlers::list_events, handlers::create_event),
    components(schemas(Event, EventSubmission, axum_helpers::ErrorResponse)),
    tags((name = "event", description = "Client update event reporting"))
)]
pub struct ApiDoc;
