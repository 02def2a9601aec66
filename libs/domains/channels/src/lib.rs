//! Channels Domain
//!
//! Decides whether a client module should follow the `/testing` or the
//! `/release` channel. An account is on the testing channel for a module
//! exactly when a membership row links the two.
//!
//! # Architecture
//!
//! ```text
//! GET /channel?module=…  (identity from X-Rh-Identity)
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← count > 0 → /testing, else /release; lookup errors fail open
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Repository  │  ← accounts_modules (module_name, account_id)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_channels::{ChannelService, SqliteMembershipRepository, handlers};
//!
//! let service = ChannelService::new(SqliteMembershipRepository::new(store.clone()));
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod sqlite;

pub use error::{ChannelError, ChannelResult};
pub use handlers::ApiDoc;
pub use models::{Channel, ChannelQuery, ChannelResponse};
pub use repository::MembershipRepository;
pub use service::ChannelService;
pub use sqlite::SqliteMembershipRepository;
