//! Module update router service.
//!
//! Exposed as a library so the binary and the end-to-end tests build the
//! exact same router.

pub mod config;
pub mod openapi;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::app;
pub use state::AppState;
