//! Out-of-band delivery of one-time codes.
//!
//! The request and resend handlers await delivery before answering, so the
//! sender seam is an object-safe trait returning boxed futures. Production
//! uses `EmailJsSender` against the EmailJS REST endpoint; without
//! credentials the server falls back to `LogCodeSender`, which writes the
//! code to the server log only. Codes are never part of an HTTP response:
//! a failed send surfaces as `delivered: false` and the visitor retries via
//! resend.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::json;
use std::{future::Future, pin::Pin};
use tracing::info;

/// Template parameters for one verification email.
#[derive(Clone, Debug)]
pub struct CodeEmail {
    pub to_name: String,
    pub to_email: String,
    pub verification_code: String,
    pub company_name: String,
}

pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Email delivery abstraction used by the enrollment handlers.
pub trait CodeSender: Send + Sync {
    /// Deliver a message or return an error with a human-readable detail.
    fn send<'a>(&'a self, message: &'a CodeEmail) -> SendFuture<'a>;
}

/// Local dev sender that logs the code instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogCodeSender;

impl CodeSender for LogCodeSender {
    fn send<'a>(&'a self, message: &'a CodeEmail) -> SendFuture<'a> {
        Box::pin(async move {
            info!(
                to_email = %message.to_email,
                to_name = %message.to_name,
                verification_code = %message.verification_code,
                "verification email send stub"
            );
            Ok(())
        })
    }
}

#[derive(Clone, Debug)]
pub struct EmailJsConfig {
    api_url: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailJsConfig {
    #[must_use]
    pub fn new(service_id: String, template_id: String) -> Self {
        Self {
            api_url: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id,
            template_id,
            public_key: String::new(),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    #[must_use]
    pub fn with_public_key(mut self, public_key: String) -> Self {
        self.public_key = public_key;
        self
    }
}

/// Sender backed by the EmailJS transactional API.
pub struct EmailJsSender {
    config: EmailJsConfig,
    client: Client,
}

impl EmailJsSender {
    /// Build the sender and its HTTP client.
    ///
    /// # Errors
    /// Returns an error if the reqwest client cannot be constructed.
    pub fn new(config: EmailJsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build EmailJS HTTP client")?;
        Ok(Self { config, client })
    }

    /// EmailJS request body; `user_id` carries the public key.
    fn request_body(&self, message: &CodeEmail) -> serde_json::Value {
        json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": {
                "to_name": message.to_name,
                "to_email": message.to_email,
                "verification_code": message.verification_code,
                "company_name": message.company_name,
            }
        })
    }
}

impl CodeSender for EmailJsSender {
    fn send<'a>(&'a self, message: &'a CodeEmail) -> SendFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.config.api_url)
                .json(&self.request_body(message))
                .send()
                .await
                .context("Failed to reach EmailJS")?;

            let status = response.status();
            if !status.is_success() {
                // EmailJS answers plain text; keep it as the failure detail.
                let detail = response.text().await.unwrap_or_default();
                bail!("EmailJS send failed: {status}: {detail}");
            }

            Ok(())
        })
    }
}
