//! OpenAPI document for the gate API.
//!
//! Swagger UI is served at `/docs`; the raw document at
//! `/api-docs/openapi.json`. Undocumented routes (`/`, `OPTIONS /health`)
//! are intentionally left out.

use utoipa::OpenApi;

use super::handlers::{gate, health};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        gate::request::request_access,
        gate::verify::verify_code,
        gate::verify::resend_code,
        gate::session::session,
        gate::session::refresh,
        gate::session::logout,
        gate::config::gate_config,
    ),
    components(schemas(
        gate::types::AccessRequest,
        gate::types::CodeSentResponse,
        gate::types::VerifyCodeRequest,
        gate::types::ResendCodeRequest,
        gate::types::SessionResponse,
        gate::types::GrantResponse,
        gate::types::RefreshResponse,
        gate::types::GateConfigResponse,
    )),
    tags(
        (name = "gate", description = "Access gate enrollment and sessions"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
