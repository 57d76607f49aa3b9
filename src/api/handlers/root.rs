use axum::response::IntoResponse;

// axum handler for the bare root, mostly useful for load balancer probes
pub async fn root() -> impl IntoResponse {
    crate::APP_USER_AGENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn root_answers_with_user_agent() {
        let response = root().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
