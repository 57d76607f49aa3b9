use anyhow::{bail, Context, Result};
use clap::{Arg, Command};

/// EmailJS delivery arguments. All three credentials must be present for
/// real delivery; with none set, codes are logged instead of sent.
#[derive(Debug)]
pub struct Options {
    pub api_url: String,
    pub credentials: Option<Credentials>,
}

#[derive(Debug)]
pub struct Credentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Options {
    /// Read EmailJS arguments out of validated matches.
    ///
    /// # Errors
    /// Returns an error on a partial credential set, which is always a
    /// deployment mistake rather than an intent to run in log-only mode.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>("emailjs-api-url")
            .cloned()
            .context("missing required argument: --emailjs-api-url")?;

        let service_id = matches.get_one::<String>("emailjs-service-id").cloned();
        let template_id = matches.get_one::<String>("emailjs-template-id").cloned();
        let public_key = matches.get_one::<String>("emailjs-public-key").cloned();

        let credentials = match (service_id, template_id, public_key) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(Credentials {
                service_id,
                template_id,
                public_key,
            }),
            (None, None, None) => None,
            _ => bail!(
                "incomplete EmailJS configuration: set all of --emailjs-service-id, --emailjs-template-id and --emailjs-public-key, or none"
            ),
        };

        Ok(Self {
            api_url,
            credentials,
        })
    }
}

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("emailjs-api-url")
                .long("emailjs-api-url")
                .help("EmailJS REST endpoint")
                .env("WARPGATE_EMAILJS_API_URL")
                .default_value("https://api.emailjs.com/api/v1.0/email/send"),
        )
        .arg(
            Arg::new("emailjs-service-id")
                .long("emailjs-service-id")
                .help("EmailJS service id")
                .env("WARPGATE_EMAILJS_SERVICE_ID"),
        )
        .arg(
            Arg::new("emailjs-template-id")
                .long("emailjs-template-id")
                .help("EmailJS template id")
                .env("WARPGATE_EMAILJS_TEMPLATE_ID"),
        )
        .arg(
            Arg::new("emailjs-public-key")
                .long("emailjs-public-key")
                .help("EmailJS public key sent as user_id")
                .env("WARPGATE_EMAILJS_PUBLIC_KEY"),
        )
}
