use database::Store;
use domain_events::{EventService, EventsState, SqliteEventRepository};
use messaging::OutboundQueue;
use std::sync::Arc;

/// Handles shared by the API routes, the readiness probe and the retention
/// sweeper.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub events: EventsState<SqliteEventRepository>,
}

impl AppState {
    /// Recorded events are copied onto `mirror` when one is given.
    pub fn new(store: Store, mirror: Option<OutboundQueue>) -> Self {
        let mut events = EventService::new(SqliteEventRepository::new(store.clone()));
        if let Some(queue) = mirror {
            events = events.with_mirror(queue);
        }

        Self {
            store,
            events: Arc::new(events),
        }
    }
}
