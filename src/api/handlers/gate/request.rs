//! Access request endpoint: validate the form, issue a code, send it.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::email::CodeEmail;

use super::rate_limit::{RateLimitAction, RateLimitDecision};
use super::session::{grant_response, mint_session};
use super::state::GateState;
use super::store::Enrollee;
use super::types::{AccessRequest, CodeSentResponse};
use super::utils::{extract_client_ip, generate_access_code, log_access, normalize_email,
    now_unix_ms, valid_email};

/// Fallback name for bypass grants submitted with a blank form.
const BYPASS_FALLBACK_NAME: &str = "Creator";

#[utoipa::path(
    post,
    path = "/v1/gate/access-request",
    request_body = AccessRequest,
    responses(
        (status = 202, description = "Verification code issued", body = CodeSentResponse),
        (status = 200, description = "Access granted directly (parity bypass)"),
        (status = 400, description = "Invalid form input", body = String),
        (status = 429, description = "Rate limited", body = String)
    ),
    tag = "gate"
)]
pub async fn request_access(
    headers: HeaderMap,
    state: Extension<Arc<GateState>>,
    payload: Option<Json<AccessRequest>>,
) -> impl IntoResponse {
    let request: AccessRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let full_name = request.full_name.trim().to_string();
    let email = normalize_email(&request.email);
    let organization = request.organization.trim().to_string();

    let client_ip = extract_client_ip(&headers);
    if state
        .rate_limiter()
        .check_ip(client_ip.as_deref(), RateLimitAction::RequestAccess)
        == RateLimitDecision::Limited
    {
        // Rate limits run before any validation or state work.
        return (StatusCode::TOO_MANY_REQUESTS, "Rate limited".to_string()).into_response();
    }

    if full_name.is_empty() || email.is_empty() || !request.nda_accepted {
        return (
            StatusCode::BAD_REQUEST,
            "Please fill in all required fields and accept the NDA".to_string(),
        )
            .into_response();
    }

    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            "Please enter a valid email address".to_string(),
        )
            .into_response();
    }

    if state
        .rate_limiter()
        .check_email(&email, RateLimitAction::RequestAccess)
        == RateLimitDecision::Limited
    {
        return (StatusCode::TOO_MANY_REQUESTS, "Rate limited".to_string()).into_response();
    }

    let now = now_unix_ms();

    // Parity bypass for the legacy client-side gate. Off unless configured.
    if state.config().is_master_code(&organization) || state.config().is_bypass_email(&email) {
        let user = Enrollee {
            full_name: if full_name.is_empty() {
                BYPASS_FALLBACK_NAME.to_string()
            } else {
                full_name
            },
            email,
            organization: state.config().company_name().to_string(),
            nda_accepted: true,
            nda_accepted_at: now,
        };
        info!(email = %user.email, "bypass grant, skipping code issuance");
        log_access(&user, &headers);
        let (token, record) = mint_session(&state, user, now).await;
        return grant_response(&state, token, &record, now);
    }

    let enrollee = Enrollee {
        full_name: full_name.clone(),
        email: email.clone(),
        organization,
        nda_accepted: true,
        nda_accepted_at: now,
    };

    let code = generate_access_code();
    state
        .store()
        .put_pending(enrollee, code.clone(), now)
        .await;

    let message = CodeEmail {
        to_name: full_name,
        to_email: email.clone(),
        verification_code: code,
        company_name: state.config().company_name().to_string(),
    };

    // Delivery failure is non-fatal: the pending slot stays so the visitor
    // can retry via resend. The code itself never appears in a response.
    let (delivered, detail) = match state.sender().send(&message).await {
        Ok(()) => (true, None),
        Err(err) => {
            error!("Failed to send verification code: {err:#}");
            (false, Some(err.to_string()))
        }
    };

    let response = CodeSentResponse {
        email,
        delivered,
        detail,
        code_ttl_seconds: state.config().code_ttl_seconds(),
    };
    (StatusCode::ACCEPTED, Json(response)).into_response()
}
