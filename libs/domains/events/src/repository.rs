//! Event repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Event, NewEvent, RowLimit};

/// Event storage
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store an event under a freshly generated identifier
    async fn insert(&self, event: NewEvent) -> Result<()>;

    /// Events ordered by `started_at` ascending, skipping `offset` rows
    async fn list(&self, limit: RowLimit, offset: u64) -> Result<Vec<Event>>;

    /// Delete events that started strictly before `before`
    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64>;
}
