//! Hourly deletion of events past the retention horizon

use chrono::{DateTime, TimeDelta, Utc};
use observability::RouterMetrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::error::Result;
use crate::repository::EventRepository;
use crate::service::EventService;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Events that started more than this many days ago are deleted
pub const RETENTION_HORIZON: i64 = 30;

const ROUTINE: &str = "db_trim";

/// Background task deleting old events.
///
/// A failed sweep is logged and counted; the next tick simply tries again.
pub struct RetentionSweeper<R: EventRepository> {
    service: Arc<EventService<R>>,
    interval: Duration,
    horizon: TimeDelta,
}

impl<R: EventRepository + 'static> RetentionSweeper<R> {
    pub fn new(service: Arc<EventService<R>>) -> Self {
        Self {
            service,
            interval: SWEEP_INTERVAL,
            horizon: TimeDelta::days(RETENTION_HORIZON),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Cutoff used by a sweep running at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.horizon
    }

    /// Run one sweep as of `now`.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = self.cutoff(now);
        match self.service.cleanup(cutoff).await {
            Ok(rows) => {
                info!(routine = ROUTINE, rows, %cutoff, "Deleted expired events");
                RouterMetrics::record_retention_sweep(rows);
                Ok(rows)
            }
            Err(e) => {
                error!(routine = ROUTINE, error = %e, %cutoff, "Deleting events failed");
                RouterMetrics::record_retention_failure();
                Err(e)
            }
        }
    }

    /// Sweep immediately, then once per interval, until the task is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                routine = ROUTINE,
                interval_secs = self.interval.as_secs(),
                "Started database trimmer"
            );
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = self.sweep_once(Utc::now()).await;
            }
        })
    }
}
