//! HTTP middleware for the API chain.
//!
//! - Request id assignment and propagation (`X-Request-Id`)
//! - Access logging
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{access_log, propagate_request_id_layer, set_request_id_layer};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(access_log))
//!     .layer(propagate_request_id_layer())
//!     .layer(set_request_id_layer());
//! ```

pub mod access_log;
pub mod request_id;

pub use access_log::access_log;
pub use request_id::{
    MakeRequestUuidV7, REQUEST_ID_HEADER, propagate_request_id_layer, set_request_id_layer,
};
