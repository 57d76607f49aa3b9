//! Command-line argument dispatch.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the gate server with its full configuration state.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{email, gate};
use anyhow::{bail, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let gate_opts = gate::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches)?;

    if let Some(bypass_email) = &gate_opts.bypass_email {
        // A typo here would silently disable the parity bypass, so fail early.
        if !crate::api::handlers::gate::valid_email(bypass_email) {
            bail!("invalid --bypass-email address: {bypass_email}");
        }
    }

    Ok(Action::Server(Args {
        port,
        frontend_base_url: gate_opts.frontend_base_url,
        access_path: gate_opts.access_path,
        company_name: gate_opts.company_name,
        session_ttl_seconds: gate_opts.session_ttl_seconds,
        code_ttl_seconds: gate_opts.code_ttl_seconds,
        resend_cooldown_seconds: gate_opts.resend_cooldown_seconds,
        expiry_warning_seconds: gate_opts.expiry_warning_seconds,
        sweep_interval_seconds: gate_opts.sweep_interval_seconds,
        master_code: gate_opts.master_code,
        bypass_email: gate_opts.bypass_email,
        emailjs_api_url: email_opts.api_url,
        emailjs: email_opts.credentials,
    }))
}
