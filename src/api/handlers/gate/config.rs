//! Public gate configuration for the static pages.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use super::state::GateState;
use super::types::GateConfigResponse;
use super::utils;

/// Non-sensitive configuration the access page needs: company name, the
/// entry URL unauthenticated pages redirect to, and code parameters.
#[utoipa::path(
    get,
    path = "/v1/gate/config",
    responses(
        (status = 200, description = "Gate configuration", body = GateConfigResponse)
    ),
    tag = "gate"
)]
pub async fn gate_config(state: Extension<Arc<GateState>>) -> impl IntoResponse {
    let response = GateConfigResponse {
        company_name: state.config().company_name().to_string(),
        access_url: state.config().access_url(),
        code_ttl_seconds: state.config().code_ttl_seconds(),
        code_length: code_length(),
    };
    (StatusCode::OK, Json(response))
}

#[allow(clippy::cast_possible_truncation)]
const fn code_length() -> u8 {
    (utils::ACCESS_CODE_MAX.ilog10() + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::super::test_support::state;
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn config_exposes_access_url() {
        let state = state();
        let response = gate_config(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let config: GateConfigResponse =
            serde_json::from_slice(&body).expect("config should parse");
        assert_eq!(config.access_url, "http://localhost:3000/access.html");
        assert_eq!(config.company_name, "Warpeed Technologies");
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_ttl_seconds, 900);
    }
}
