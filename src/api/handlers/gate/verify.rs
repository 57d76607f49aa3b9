//! Code verification and resend endpoints.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::api::email::CodeEmail;

use super::rate_limit::{RateLimitAction, RateLimitDecision};
use super::session::{grant_response, mint_session};
use super::state::GateState;
use super::store::{ResendOutcome, VerifyOutcome};
use super::types::{ResendCodeRequest, VerifyCodeRequest};
use super::utils::{extract_client_ip, generate_access_code, log_access, normalize_email,
    now_unix_ms, valid_email};

/// Check an entered code against the pending registration for the address.
#[utoipa::path(
    post,
    path = "/v1/gate/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Access granted", body = super::types::GrantResponse),
        (status = 400, description = "Invalid code, retry allowed", body = String),
        (status = 404, description = "No pending access request", body = String),
        (status = 410, description = "Code expired, restart required", body = String),
        (status = 429, description = "Rate limited", body = String)
    ),
    tag = "gate"
)]
pub async fn verify_code(
    headers: HeaderMap,
    state: Extension<Arc<GateState>>,
    payload: Option<Json<VerifyCodeRequest>>,
) -> impl IntoResponse {
    let request: VerifyCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    let entered_code = request.code.trim();
    if entered_code.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing code".to_string()).into_response();
    }

    let client_ip = extract_client_ip(&headers);
    if state
        .rate_limiter()
        .check_ip(client_ip.as_deref(), RateLimitAction::VerifyCode)
        == RateLimitDecision::Limited
        || state
            .rate_limiter()
            .check_email(&email, RateLimitAction::VerifyCode)
            == RateLimitDecision::Limited
    {
        // Brute-forcing a 6-digit code is the obvious attack here.
        return (StatusCode::TOO_MANY_REQUESTS, "Rate limited".to_string()).into_response();
    }

    let now = now_unix_ms();
    let code_ttl_ms = state.config().code_ttl_ms();
    match state
        .store()
        .verify_code(&email, entered_code, code_ttl_ms, now)
        .await
    {
        VerifyOutcome::Granted(user) => {
            log_access(&user, &headers);
            let (token, record) = mint_session(&state, user, now).await;
            grant_response(&state, token, &record, now)
        }
        VerifyOutcome::Expired => (
            StatusCode::GONE,
            "Verification code has expired. Please request a new code".to_string(),
        )
            .into_response(),
        VerifyOutcome::Mismatch => (
            StatusCode::BAD_REQUEST,
            "Invalid verification code. Please try again".to_string(),
        )
            .into_response(),
        VerifyOutcome::NoPending => (
            StatusCode::NOT_FOUND,
            "No pending access request. Please start again".to_string(),
        )
            .into_response(),
    }
}

/// Reissue a fresh code for an in-flight registration (always 204 to avoid
/// revealing which addresses are mid-enrollment).
#[utoipa::path(
    post,
    path = "/v1/gate/resend-code",
    request_body = ResendCodeRequest,
    responses(
        (status = 204, description = "Resend accepted")
    ),
    tag = "gate"
)]
pub async fn resend_code(
    headers: HeaderMap,
    state: Extension<Arc<GateState>>,
    payload: Option<Json<ResendCodeRequest>>,
) -> impl IntoResponse {
    let request: ResendCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        // Always return 204 for invalid emails to avoid address probing.
        return StatusCode::NO_CONTENT.into_response();
    }

    let client_ip = extract_client_ip(&headers);
    if state
        .rate_limiter()
        .check_ip(client_ip.as_deref(), RateLimitAction::ResendCode)
        == RateLimitDecision::Limited
        || state
            .rate_limiter()
            .check_email(&email, RateLimitAction::ResendCode)
            == RateLimitDecision::Limited
    {
        // Resend is intentionally opaque; rate limits still return 204.
        return StatusCode::NO_CONTENT.into_response();
    }

    let now = now_unix_ms();
    let code = generate_access_code();
    let cooldown_ms = state.config().resend_cooldown_ms();
    match state
        .store()
        .reissue_code(&email, code.clone(), cooldown_ms, now)
        .await
    {
        ResendOutcome::Reissued(user) => {
            let message = CodeEmail {
                to_name: user.full_name,
                to_email: email,
                verification_code: code,
                company_name: state.config().company_name().to_string(),
            };
            if let Err(err) = state.sender().send(&message).await {
                // Keep the response opaque; the fresh code stays valid and a
                // later resend can still deliver it.
                error!("Failed to resend verification code: {err:#}");
            }
            StatusCode::NO_CONTENT.into_response()
        }
        ResendOutcome::Cooldown | ResendOutcome::NoPending => {
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
