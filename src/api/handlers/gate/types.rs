//! Request/response types for gate endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccessRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub nda_accepted: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CodeSentResponse {
    pub email: String,
    /// False when the out-of-band send failed; the pending registration is
    /// kept either way so the visitor can ask for a resend.
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub code_ttl_seconds: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendCodeRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub session_id: String,
    pub full_name: String,
    pub email: String,
    pub organization: String,
    pub nda_accepted: bool,
    pub login_at: i64,
    pub expires_at: i64,
    pub expires_in_seconds: i64,
    /// True once less than the configured warning window remains; the page
    /// script uses this to offer an extension exactly once per tab.
    pub expiring_soon: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GrantResponse {
    /// Raw session token; also set as an `HttpOnly` cookie. Shown once.
    pub token: String,
    pub session: SessionResponse,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshResponse {
    pub expires_at: i64,
    pub expires_in_seconds: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GateConfigResponse {
    pub company_name: String,
    pub access_url: String,
    pub code_ttl_seconds: i64,
    pub code_length: u8,
}
