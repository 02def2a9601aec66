use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use super::IdentityError;

/// Decoded `X-Rh-Identity` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XRhIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<serde_json::Value>,

    #[serde(default)]
    pub identity: Principal,
}

impl XRhIdentity {
    /// Decode a raw header value: base64, then JSON.
    pub fn decode(header: &str) -> Result<Self, IdentityError> {
        let bytes = STANDARD.decode(header.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Encode as a header value.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        Ok(STANDARD.encode(serde_json::to_vec(self)?))
    }
}

/// The calling principal.
///
/// Only `org_id` is always present; every other field depends on the
/// identity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_account_number: Option<String>,

    #[serde(default)]
    pub org_id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associate: Option<Associate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<Internal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<System>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x509: Option<X509>,
}

impl Principal {
    /// Account number, or `""` when the identity carries none.
    pub fn account(&self) -> &str {
        self.account_number.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Associate {
    #[serde(rename = "Role")]
    pub role: Vec<String>,
    pub email: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "rhatUUID")]
    pub rhat_uuid: String,
    pub surname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Internal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_access: Option<bool>,
    pub org_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct System {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    pub cn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub is_active: bool,
    pub is_internal: bool,
    pub is_org_admin: bool,
    pub last_name: String,
    pub locale: String,
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct X509 {
    pub subject_dn: String,
    pub issuer_dn: String,
}
