use crate::{
    api,
    api::email::{CodeSender, EmailJsConfig, EmailJsSender, LogCodeSender},
    api::handlers::gate::GateConfig,
    cli::commands::email::Credentials,
};
use anyhow::Result;
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_base_url: String,
    pub access_path: String,
    pub company_name: String,
    pub session_ttl_seconds: i64,
    pub code_ttl_seconds: i64,
    pub resend_cooldown_seconds: i64,
    pub expiry_warning_seconds: i64,
    pub sweep_interval_seconds: u64,
    pub master_code: Option<String>,
    pub bypass_email: Option<String>,
    pub emailjs_api_url: String,
    pub emailjs: Option<Credentials>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the email sender cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let mut config = GateConfig::new(args.frontend_base_url)
        .with_access_path(args.access_path)
        .with_company_name(args.company_name)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_code_ttl_seconds(args.code_ttl_seconds)
        .with_resend_cooldown_seconds(args.resend_cooldown_seconds)
        .with_expiry_warning_seconds(args.expiry_warning_seconds);

    if let Some(master_code) = args.master_code {
        info!("Master-code bypass is enabled");
        config = config.with_master_code(SecretString::from(master_code));
    }

    if let Some(bypass_email) = args.bypass_email {
        info!("Designated-address bypass is enabled");
        config = config.with_bypass_email(bypass_email);
    }

    let sender: Arc<dyn CodeSender> = match args.emailjs {
        Some(credentials) => Arc::new(EmailJsSender::new(
            EmailJsConfig::new(credentials.service_id, credentials.template_id)
                .with_api_url(args.emailjs_api_url)
                .with_public_key(credentials.public_key),
        )?),
        None => {
            // Log-only delivery keeps local development working without an
            // EmailJS account; codes land in the server log, never in responses.
            info!("EmailJS not configured, verification codes will be logged");
            Arc::new(LogCodeSender)
        }
    };

    api::new(
        args.port,
        config,
        sender,
        Duration::from_secs(args.sweep_interval_seconds),
    )
    .await
}
