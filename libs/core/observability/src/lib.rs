//! Metrics for the module update router.
//!
//! This crate provides:
//! - Prometheus recorder installation and the `/metrics` handler
//! - Per-route HTTP request metrics middleware
//! - Router business metrics ([`RouterMetrics`])
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, RouterMetrics};
//!
//! init_metrics()?;
//!
//! RouterMetrics::record_request("channel");
//!
//! let metrics = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod router;

pub use middleware::metrics_middleware;
pub use router::RouterMetrics;

pub use metrics::{counter, gauge, histogram};
pub use metrics_exporter_prometheus::BuildError;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder.
///
/// Safe to call more than once; later calls return the handle installed by
/// the first successful call.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `/metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    describe_counter!(
        router::REQUESTS,
        "Total number of requests to router endpoints"
    );
    describe_counter!(router::EVENTS, "Total number of events recorded");
    describe_histogram!(
        router::CLIENT_SECONDS,
        "Seconds a client spent in an update phase"
    );
    describe_counter!(
        router::CHANNEL_FAIL_OPEN,
        "Channel lookups answered with the release default after a storage error"
    );
    describe_counter!(
        router::RETENTION_DELETED,
        "Event rows removed by the retention sweeper"
    );
    describe_counter!(
        router::RETENTION_FAILURES,
        "Retention sweeps that failed"
    );
}
