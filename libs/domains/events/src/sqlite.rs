//! SQLite event storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::Store;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Statement};
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Event, NewEvent, RowLimit};
use crate::repository::EventRepository;

const INSERT_SQL: &str = "INSERT INTO events \
     (event_id, phase, started_at, exit, exception, ended_at, machine_id, core_version, core_path) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";
const LIST_SQL: &str = "SELECT event_id, phase, started_at, exit, exception, ended_at, \
     machine_id, core_version, core_path \
     FROM events ORDER BY started_at ASC, rowid ASC LIMIT ? OFFSET ?";
const DELETE_SQL: &str = "DELETE FROM events WHERE started_at < ?";

/// Timestamps are stored as Unix nanoseconds. Values past either end of the
/// representable range clamp to it.
fn timestamp(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt()
        .unwrap_or(if at.timestamp() < 0 { i64::MIN } else { i64::MAX })
}

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    Ok(Event {
        event_id: row.try_get("event_id")?,
        phase: row.try_get("phase")?,
        started_at: DateTime::from_timestamp_nanos(row.try_get("started_at")?),
        exit: row.try_get("exit")?,
        exception: row.try_get("exception")?,
        ended_at: DateTime::from_timestamp_nanos(row.try_get("ended_at")?),
        machine_id: row.try_get("machine_id")?,
        core_version: row.try_get("core_version")?,
        core_path: row.try_get("core_path")?,
    })
}

/// [`EventRepository`] over the `events` table
#[derive(Clone)]
pub struct SqliteEventRepository {
    store: Store,
}

impl SqliteEventRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    #[instrument(skip(self, event), fields(phase = %event.phase))]
    async fn insert(&self, event: NewEvent) -> Result<()> {
        let statement = self.store.prepared(INSERT_SQL).await?;
        statement
            .query()
            .bind(Uuid::now_v7().to_string())
            .bind(event.phase)
            .bind(timestamp(event.started_at))
            .bind(event.exit)
            .bind(event.exception)
            .bind(timestamp(event.ended_at))
            .bind(event.machine_id)
            .bind(event.core_version)
            .bind(event.core_path)
            .execute(self.store.pool())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: RowLimit, offset: u64) -> Result<Vec<Event>> {
        if limit == RowLimit::AtMost(0) {
            return Ok(Vec::new());
        }

        let statement = self.store.prepared(LIST_SQL).await?;
        let rows = statement
            .query()
            .bind(limit.as_sql())
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(self.store.pool())
            .await?;

        rows.iter().map(event_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64> {
        let statement = self.store.prepared(DELETE_SQL).await?;
        let result = statement
            .query()
            .bind(timestamp(before))
            .execute(self.store.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
