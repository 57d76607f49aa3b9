use anyhow::{Context, Result};
use clap::{Arg, Command};

/// Gate lifecycle arguments parsed from CLI matches.
#[derive(Debug)]
pub struct Options {
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
}

impl Options {
    /// Read gate arguments out of validated matches.
    ///
    /// # Errors
    /// Returns an error if a defaulted argument is missing (clap misconfiguration).
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        Ok(Self {
            frontend_base_url: matches
                .get_one::<String>("frontend-base-url")
                .cloned()
                .context("missing required argument: --frontend-base-url")?,
            access_path: matches
                .get_one::<String>("access-path")
                .cloned()
                .context("missing required argument: --access-path")?,
            company_name: matches
                .get_one::<String>("company-name")
                .cloned()
                .context("missing required argument: --company-name")?,
            session_ttl_seconds: matches
                .get_one::<i64>("session-ttl-seconds")
                .copied()
                .context("missing required argument: --session-ttl-seconds")?,
            code_ttl_seconds: matches
                .get_one::<i64>("code-ttl-seconds")
                .copied()
                .context("missing required argument: --code-ttl-seconds")?,
            resend_cooldown_seconds: matches
                .get_one::<i64>("resend-cooldown-seconds")
                .copied()
                .context("missing required argument: --resend-cooldown-seconds")?,
            expiry_warning_seconds: matches
                .get_one::<i64>("expiry-warning-seconds")
                .copied()
                .context("missing required argument: --expiry-warning-seconds")?,
            sweep_interval_seconds: matches
                .get_one::<u64>("sweep-interval-seconds")
                .copied()
                .context("missing required argument: --sweep-interval-seconds")?,
            master_code: matches.get_one::<String>("master-code").cloned(),
            bypass_email: matches.get_one::<String>("bypass-email").cloned(),
        })
    }
}

pub fn with_args(command: Command) -> Command {
    let command = with_frontend_args(command);
    let command = with_lifecycle_args(command);
    with_bypass_args(command)
}

fn with_frontend_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("frontend-base-url")
                .long("frontend-base-url")
                .help("Base URL of the static site, used for CORS and redirects")
                .env("WARPGATE_FRONTEND_BASE_URL")
                .default_value("https://warpeed.space"),
        )
        .arg(
            Arg::new("access-path")
                .long("access-path")
                .help("Path of the access entry page under the frontend base URL")
                .env("WARPGATE_ACCESS_PATH")
                .default_value("/access.html"),
        )
        .arg(
            Arg::new("company-name")
                .long("company-name")
                .help("Company name used in verification emails")
                .env("WARPGATE_COMPANY_NAME")
                .default_value("Warpeed Technologies"),
        )
}

fn with_lifecycle_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("session-ttl-seconds")
                .long("session-ttl-seconds")
                .help("Session lifetime in seconds")
                .env("WARPGATE_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("code-ttl-seconds")
                .long("code-ttl-seconds")
                .help("One-time code lifetime in seconds")
                .env("WARPGATE_CODE_TTL_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("resend-cooldown-seconds")
                .long("resend-cooldown-seconds")
                .help("Cooldown before a new code is issued for the same address")
                .env("WARPGATE_RESEND_COOLDOWN_SECONDS")
                .default_value("60")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("expiry-warning-seconds")
                .long("expiry-warning-seconds")
                .help("Remaining lifetime below which a session reports expiring soon")
                .env("WARPGATE_EXPIRY_WARNING_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("sweep-interval-seconds")
                .long("sweep-interval-seconds")
                .help("Interval between expired-record sweeps")
                .env("WARPGATE_SWEEP_INTERVAL_SECONDS")
                .default_value("60")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn with_bypass_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("master-code")
                .long("master-code")
                .help("Legacy master code granting access without verification (leave unset to disable)")
                .env("WARPGATE_MASTER_CODE")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("bypass-email")
                .long("bypass-email")
                .help("Address granted access without verification (leave unset to disable)")
                .env("WARPGATE_BYPASS_EMAIL"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn gate_defaults() {
        temp_env::with_vars_unset(
            [
                "WARPGATE_FRONTEND_BASE_URL",
                "WARPGATE_SESSION_TTL_SECONDS",
                "WARPGATE_CODE_TTL_SECONDS",
                "WARPGATE_MASTER_CODE",
                "WARPGATE_BYPASS_EMAIL",
            ],
            || {
                let command = commands::new();
                let matches = command.get_matches_from(vec!["warpgate"]);
                let options = Options::parse(&matches).expect("options should parse");

                assert_eq!(options.frontend_base_url, "https://warpeed.space");
                assert_eq!(options.access_path, "/access.html");
                assert_eq!(options.company_name, "Warpeed Technologies");
                assert_eq!(options.session_ttl_seconds, 86400);
                assert_eq!(options.code_ttl_seconds, 900);
                assert_eq!(options.resend_cooldown_seconds, 60);
                assert_eq!(options.expiry_warning_seconds, 300);
                assert_eq!(options.sweep_interval_seconds, 60);
                assert_eq!(options.master_code, None);
                assert_eq!(options.bypass_email, None);
            },
        );
    }

    #[test]
    fn gate_overrides_from_env() {
        temp_env::with_vars(
            [
                ("WARPGATE_SESSION_TTL_SECONDS", Some("3600")),
                ("WARPGATE_CODE_TTL_SECONDS", Some("120")),
                ("WARPGATE_MASTER_CODE", Some("WARPEED2025CREATOR")),
                ("WARPGATE_BYPASS_EMAIL", Some("heinz@warpeed.space")),
            ],
            || {
                let command = commands::new();
                let matches = command.get_matches_from(vec!["warpgate"]);
                let options = Options::parse(&matches).expect("options should parse");

                assert_eq!(options.session_ttl_seconds, 3600);
                assert_eq!(options.code_ttl_seconds, 120);
                assert_eq!(options.master_code.as_deref(), Some("WARPEED2025CREATOR"));
                assert_eq!(options.bypass_email.as_deref(), Some("heinz@warpeed.space"));
            },
        );
    }
}
