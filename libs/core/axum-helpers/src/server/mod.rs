//! Server infrastructure.
//!
//! - `/ping` liveness router
//! - Readiness aggregation for `/ready`
//! - Serving with coordinated graceful shutdown
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_production_app, ping_router};
//!
//! let shutdown = ShutdownCoordinator::default();
//! let app = ping_router().merge(api);
//!
//! create_production_app(app, &config, shutdown, Duration::from_secs(30), async move {
//!     store.close().await;
//! })
//! .await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, serve};
pub use health::{HealthCheckFuture, ping, ping_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
