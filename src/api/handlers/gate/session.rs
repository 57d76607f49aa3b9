//! Session endpoints: the gatekeeper check, refresh, and logout.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::state::{GateConfig, GateState};
use super::store::{Enrollee, SessionRecord};
use super::types::{GrantResponse, RefreshResponse, SessionResponse};
use super::utils::{generate_session_token, hash_session_token, now_unix_ms};

const SESSION_COOKIE_NAME: &str = "warpeed_session";

/// Server-side gatekeeper: report whether the presented token names a valid
/// session. Anything short of a valid record answers `204`, and invalid
/// records are deleted on sight.
#[utoipa::path(
    get,
    path = "/v1/gate/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "gate"
)]
pub async fn session(headers: HeaderMap, state: Extension<Arc<GateState>>) -> impl IntoResponse {
    // Missing tokens are treated as "no session" to avoid leaking gate state.
    let Some(token) = extract_session_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let token_hash = hash_session_token(&token);
    let now = now_unix_ms();
    match state.store().lookup_session(&token_hash, now).await {
        Some(record) => {
            let view = session_view(&record, state.config(), now);
            (StatusCode::OK, Json(view)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Reset a valid session to a full lifetime. `204` means there is nothing to
/// refresh and the client should return to the access page.
#[utoipa::path(
    post,
    path = "/v1/gate/session/refresh",
    responses(
        (status = 200, description = "Session extended", body = RefreshResponse),
        (status = 204, description = "No active session")
    ),
    tag = "gate"
)]
pub async fn refresh(headers: HeaderMap, state: Extension<Arc<GateState>>) -> impl IntoResponse {
    let Some(token) = extract_session_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let token_hash = hash_session_token(&token);
    let now = now_unix_ms();
    let ttl_ms = state.config().session_ttl_ms();
    match state
        .store()
        .refresh_session(&token_hash, ttl_ms, now)
        .await
    {
        Some(record) => {
            let response = RefreshResponse {
                expires_at: record.expires_at,
                expires_in_seconds: (record.expires_at - now) / 1000,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/gate/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "gate"
)]
pub async fn logout(headers: HeaderMap, state: Extension<Arc<GateState>>) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        let token_hash = hash_session_token(&token);
        state.store().delete_session(&token_hash).await;
    }

    // Always clear the cookie, even if the session record was missing.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(state.config()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

/// Create and persist a session for a verified (or bypassed) enrollee.
/// Returns the raw token alongside the stored record.
pub(super) async fn mint_session(
    state: &GateState,
    user: Enrollee,
    now: i64,
) -> (String, SessionRecord) {
    let token = generate_session_token();
    let token_hash = hash_session_token(&token);
    let record = SessionRecord {
        session_id: Uuid::new_v4(),
        user,
        authenticated: true,
        login_at: now,
        expires_at: now + state.config().session_ttl_ms(),
    };
    state
        .store()
        .insert_session(token_hash, record.clone())
        .await;
    (token, record)
}

/// Grant response shared by verification and the parity bypass.
pub(super) fn grant_response(
    state: &GateState,
    token: String,
    record: &SessionRecord,
    now: i64,
) -> axum::response::Response {
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = session_cookie(state.config(), &token) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    let response = GrantResponse {
        token,
        session: session_view(record, state.config(), now),
    };
    (StatusCode::OK, response_headers, Json(response)).into_response()
}

pub(super) fn session_view(
    record: &SessionRecord,
    config: &GateConfig,
    now: i64,
) -> SessionResponse {
    let remaining_ms = (record.expires_at - now).max(0);
    SessionResponse {
        session_id: record.session_id.to_string(),
        full_name: record.user.full_name.clone(),
        email: record.user.email.clone(),
        organization: record.user.organization.clone(),
        nda_accepted: record.user.nda_accepted,
        login_at: record.login_at,
        expires_at: record.expires_at,
        expires_in_seconds: remaining_ms / 1000,
        expiring_soon: remaining_ms < config.expiry_warning_ms(),
    }
}

/// Build a secure `HttpOnly` cookie for the session token.
fn session_cookie(config: &GateConfig, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.session_ttl_seconds();
    // Only mark cookies secure when the frontend is served over HTTPS.
    let secure = config.session_cookie_secure();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(config: &GateConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = config.session_cookie_secure();
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
