//! Shared fixtures for gate handler tests.

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::rate_limit::NoopRateLimiter;
use super::state::{GateConfig, GateState};
use crate::api::email::{CodeEmail, CodeSender, LogCodeSender, SendFuture};

/// Sender that records every message so tests can read the issued code.
pub(crate) struct RecordingSender {
    sent: Mutex<Vec<CodeEmail>>,
}

impl RecordingSender {
    pub(crate) fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn sent(&self) -> Vec<CodeEmail> {
        self.sent.lock().await.clone()
    }

    pub(crate) async fn last_code(&self) -> Option<String> {
        self.sent
            .lock()
            .await
            .last()
            .map(|message| message.verification_code.clone())
    }
}

impl CodeSender for RecordingSender {
    fn send<'a>(&'a self, message: &'a CodeEmail) -> SendFuture<'a> {
        Box::pin(async move {
            self.sent.lock().await.push(message.clone());
            Ok(())
        })
    }
}

/// Sender that always fails, for delivery-failure paths.
pub(crate) struct FailingSender;

impl CodeSender for FailingSender {
    fn send<'a>(&'a self, _message: &'a CodeEmail) -> SendFuture<'a> {
        Box::pin(async move { Err(anyhow::anyhow!("delivery is down")) })
    }
}

fn base_config() -> GateConfig {
    GateConfig::new("http://localhost:3000".to_string())
}

pub(crate) fn state() -> Arc<GateState> {
    Arc::new(GateState::new(
        base_config(),
        Arc::new(LogCodeSender),
        Arc::new(NoopRateLimiter),
    ))
}

pub(crate) fn state_with_sender(sender: Arc<dyn CodeSender>) -> Arc<GateState> {
    Arc::new(GateState::new(
        base_config(),
        sender,
        Arc::new(NoopRateLimiter),
    ))
}

pub(crate) fn state_with_config(
    sender: Arc<dyn CodeSender>,
    configure: impl FnOnce(GateConfig) -> GateConfig,
) -> Arc<GateState> {
    Arc::new(GateState::new(
        configure(base_config()),
        sender,
        Arc::new(NoopRateLimiter),
    ))
}

pub(crate) fn state_with_bypass(master_code: &str, bypass_email: &str) -> Arc<GateState> {
    Arc::new(GateState::new(
        base_config()
            .with_master_code(SecretString::from(master_code.to_string()))
            .with_bypass_email(bypass_email.to_string()),
        Arc::new(LogCodeSender),
        Arc::new(NoopRateLimiter),
    ))
}

pub(crate) fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}
