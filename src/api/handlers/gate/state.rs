//! Gate state and configuration.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::rate_limit::RateLimiter;
use super::store::GateStore;
use crate::api::email::CodeSender;

const DEFAULT_ACCESS_PATH: &str = "/access.html";
const DEFAULT_COMPANY_NAME: &str = "Warpeed Technologies";
const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_CODE_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_RESEND_COOLDOWN_SECONDS: i64 = 60;
const DEFAULT_EXPIRY_WARNING_SECONDS: i64 = 5 * 60;

#[derive(Clone, Debug)]
pub struct GateConfig {
    frontend_base_url: String,
    access_path: String,
    company_name: String,
    session_ttl_seconds: i64,
    code_ttl_seconds: i64,
    resend_cooldown_seconds: i64,
    expiry_warning_seconds: i64,
    master_code: Option<SecretString>,
    bypass_email: Option<String>,
}

impl GateConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            access_path: DEFAULT_ACCESS_PATH.to_string(),
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
            expiry_warning_seconds: DEFAULT_EXPIRY_WARNING_SECONDS,
            master_code: None,
            bypass_email: None,
        }
    }

    #[must_use]
    pub fn with_access_path(mut self, access_path: String) -> Self {
        self.access_path = access_path;
        self
    }

    #[must_use]
    pub fn with_company_name(mut self, company_name: String) -> Self {
        self.company_name = company_name;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_code_ttl_seconds(mut self, seconds: i64) -> Self {
        self.code_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_resend_cooldown_seconds(mut self, seconds: i64) -> Self {
        self.resend_cooldown_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_expiry_warning_seconds(mut self, seconds: i64) -> Self {
        self.expiry_warning_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_master_code(mut self, master_code: SecretString) -> Self {
        self.master_code = Some(master_code);
        self
    }

    #[must_use]
    pub fn with_bypass_email(mut self, bypass_email: String) -> Self {
        self.bypass_email = Some(bypass_email);
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// The fixed access entry URL all unauthenticated redirects target.
    #[must_use]
    pub fn access_url(&self) -> String {
        let base = self.frontend_base_url.trim_end_matches('/');
        format!("{base}{}", self.access_path)
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn code_ttl_seconds(&self) -> i64 {
        self.code_ttl_seconds
    }

    pub(super) fn session_ttl_ms(&self) -> i64 {
        self.session_ttl_seconds.saturating_mul(1000)
    }

    pub(super) fn code_ttl_ms(&self) -> i64 {
        self.code_ttl_seconds.saturating_mul(1000)
    }

    pub(super) fn resend_cooldown_ms(&self) -> i64 {
        self.resend_cooldown_seconds.saturating_mul(1000)
    }

    pub(super) fn expiry_warning_ms(&self) -> i64 {
        self.expiry_warning_seconds.saturating_mul(1000)
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }

    /// Legacy master-code bypass; never matches when unconfigured.
    pub(super) fn is_master_code(&self, organization: &str) -> bool {
        match &self.master_code {
            Some(master_code) => {
                !organization.is_empty() && organization == master_code.expose_secret()
            }
            None => false,
        }
    }

    /// Designated-address bypass; never matches when unconfigured.
    pub(super) fn is_bypass_email(&self, email_normalized: &str) -> bool {
        match &self.bypass_email {
            Some(bypass_email) => {
                bypass_email.trim().to_lowercase() == email_normalized
            }
            None => false,
        }
    }
}

pub struct GateState {
    config: GateConfig,
    store: GateStore,
    sender: Arc<dyn CodeSender>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl GateState {
    pub fn new(
        config: GateConfig,
        sender: Arc<dyn CodeSender>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            config,
            store: GateStore::new(),
            sender,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &GateStore {
        &self.store
    }

    pub(super) fn sender(&self) -> &dyn CodeSender {
        self.sender.as_ref()
    }

    pub(super) fn rate_limiter(&self) -> &dyn RateLimiter {
        self.rate_limiter.as_ref()
    }
}
