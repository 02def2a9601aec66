//! Event service layer

use crate::error::Result;
use crate::models::{Event, EventSubmission, NewEvent, RowLimit};
use crate::repository::EventRepository;
use chrono::{DateTime, Utc};
use messaging::OutboundQueue;
use observability::RouterMetrics;
use tracing::{debug, info, instrument, warn};

/// Event service coordinating storage, metrics and the optional mirror
pub struct EventService<R: EventRepository> {
    repository: R,
    mirror: Option<OutboundQueue>,
}

impl<R: EventRepository> EventService<R> {
    /// Create a new event service without mirroring
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            mirror: None,
        }
    }

    /// Copy every recorded event onto `queue`
    pub fn with_mirror(mut self, queue: OutboundQueue) -> Self {
        self.mirror = Some(queue);
        self
    }

    /// Validate and store a submission
    #[instrument(skip(self, submission))]
    pub async fn record(&self, submission: EventSubmission) -> Result<()> {
        let event = submission.validate()?;
        self.repository.insert(event.clone()).await?;
        debug!(phase = %event.phase, core_version = %event.core_version, "Event stored");

        RouterMetrics::record_event(&event.core_version);
        RouterMetrics::observe_client_elapsed(&event.phase, event.started_at, event.ended_at);
        self.mirror(&event);

        Ok(())
    }

    /// Hand the event to the mirror queue. Never fails the recording.
    fn mirror(&self, event: &NewEvent) {
        let Some(queue) = &self.mirror else {
            return;
        };
        let payload = match serde_json::to_vec(event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize event for mirroring");
                return;
            }
        };
        if let Err(e) = queue.enqueue(payload) {
            warn!(error = %e, "Event not mirrored");
        }
    }

    /// List events in start-time order
    #[instrument(skip(self))]
    pub async fn list(&self, limit: RowLimit, offset: u64) -> Result<Vec<Event>> {
        self.repository.list(limit, offset).await
    }

    /// Delete events older than a certain date
    #[instrument(skip(self))]
    pub async fn cleanup(&self, before: DateTime<Utc>) -> Result<u64> {
        let deleted = self.repository.delete_before(before).await?;
        info!(deleted_count = deleted, "Old events cleaned up");
        Ok(deleted)
    }
}
