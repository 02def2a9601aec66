//! `X-Rh-Identity` header decoding.
//!
//! The header carries base64-encoded JSON of the form `{"identity": {...}}`.
//! [`identity_middleware`] rejects requests whose header is missing or
//! malformed with a 400 envelope and otherwise stores the decoded
//! [`XRhIdentity`] in the request extensions, where handlers pick it up with
//! the [`Identity`] extractor.

mod error;
mod middleware;
mod principal;

pub use error::IdentityError;
pub use middleware::{Identity, identity_middleware};
pub use principal::{Associate, Internal, Principal, System, User, X509, XRhIdentity};

/// Header carrying the caller identity.
pub const IDENTITY_HEADER: &str = "x-rh-identity";
