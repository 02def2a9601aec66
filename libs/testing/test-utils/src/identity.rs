//! `X-Rh-Identity` header values for requests that pass the identity
//! middleware.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

pub const IDENTITY_HEADER: &str = "X-Rh-Identity";

/// Base64 header value for a `User` identity on `account`.
pub fn identity_header(account: &str) -> String {
    encode(&json!({
        "identity": {
            "account_number": account,
            "org_id": "10001",
            "type": "User",
            "auth_type": "basic-auth",
            "internal": { "org_id": "10001" },
            "user": {
                "email": "test@redhat.com",
                "first_name": "test",
                "is_active": true,
                "is_internal": false,
                "is_org_admin": false,
                "last_name": "user",
                "locale": "en_US",
                "user_id": "1",
                "username": "test@redhat.com"
            }
        }
    }))
}

/// Base64-encode an arbitrary JSON document, valid or not as an identity.
pub fn encode(document: &Value) -> String {
    STANDARD.encode(document.to_string())
}
