//! Business metrics recorded by the channel and event handlers and the
//! retention sweeper.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};

pub const REQUESTS: &str = "module_update_router_requests";
pub const EVENTS: &str = "module_update_router_events";
pub const CLIENT_SECONDS: &str = "module_update_router_client_seconds";
pub const CHANNEL_FAIL_OPEN: &str = "module_update_router_channel_fail_open_total";
pub const RETENTION_DELETED: &str = "module_update_router_retention_deleted_total";
pub const RETENTION_FAILURES: &str = "module_update_router_retention_failures_total";

/// Router metrics recorder
pub struct RouterMetrics;

impl RouterMetrics {
    /// Count a request to an API endpoint (`channel`, `event`)
    pub fn record_request(endpoint: &str) {
        counter!(REQUESTS, "endpoint" => endpoint.to_string()).increment(1);
    }

    /// Count a recorded event
    pub fn record_event(core_version: &str) {
        counter!(EVENTS, "core_version" => core_version.to_string()).increment(1);
    }

    /// Observe how long the client spent in `phase`.
    ///
    /// Negative spans (clock skew on the client) are recorded as zero.
    pub fn observe_client_elapsed(phase: &str, started_at: DateTime<Utc>, ended_at: DateTime<Utc>) {
        let seconds = (ended_at - started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        histogram!(CLIENT_SECONDS, "phase" => phase.to_string()).record(seconds);
    }

    /// A membership lookup failed and the release channel was returned.
    pub fn record_channel_fail_open() {
        counter!(CHANNEL_FAIL_OPEN).increment(1);
    }

    pub fn record_retention_sweep(deleted: u64) {
        counter!(RETENTION_DELETED).increment(deleted);
    }

    pub fn record_retention_failure() {
        counter!(RETENTION_FAILURES).increment(1);
    }
}
