//! # Axum Helpers
//!
//! Shared HTTP plumbing for the module update router.
//!
//! ## Modules
//!
//! - **[`errors`]**: JSON error envelope (`{"errors":[{"status","title"}]}`)
//! - **[`identity`]**: `X-Rh-Identity` middleware and extractor
//! - **[`http`]**: Request id and access-log middleware
//! - **[`server`]**: `/ping`, readiness checks, serving with graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use axum_helpers::{Identity, ShutdownCoordinator, create_production_app, identity_middleware, ping_router};
//!
//! async fn whoami(Identity(id): Identity) -> String {
//!     id.identity.account().to_string()
//! }
//!
//! let api = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(middleware::from_fn(identity_middleware));
//!
//! create_production_app(
//!     ping_router().nest("/api", api),
//!     &ServerConfig::default(),
//!     ShutdownCoordinator::default(),
//!     Duration::from_secs(30),
//!     async {},
//! )
//! .await?;
//! ```

pub mod errors;
pub mod http;
pub mod identity;
pub mod server;

pub use errors::{AppError, ErrorObject, ErrorResponse, error_response};
pub use errors::handlers::{method_not_allowed, not_found};

pub use identity::{Identity, IdentityError, Principal, XRhIdentity, identity_middleware};

pub use http::{access_log, propagate_request_id_layer, set_request_id_layer};

pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_production_app, ping, ping_router,
    run_health_checks, serve, shutdown_signal,
};
