use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
use folio_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Load the files listed in `FOLIO_CONFIG` (or the bundled defaults) and apply
/// the deployment's environment variables on top.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var_os("FOLIO_CONFIG")
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_CONFIG_PATH)]);

    load_with_overrides(&paths, &Overrides::from_env())
}

pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &Overrides,
) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .set_override_option(
            "email.resend.api_key",
            overrides.resend_api_key.clone().map(|key| key.0),
        )?
        .set_override_option("contact.recipient", overrides.contact_recipient.clone())?
        .set_override_option("email.from", overrides.email_from.clone())?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

/// Values taken from the environment that win over every config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `RESEND_API_KEY`
    pub resend_api_key: Option<Sensitive<String>>,
    /// `CONTACT_TO`
    pub contact_recipient: Option<String>,
    /// `CONTACT_FROM`
    pub email_from: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        let var = |name| std::env::var(name).ok().filter(|value| !value.trim().is_empty());

        Self {
            resend_api_key: var("RESEND_API_KEY").map(Into::into),
            contact_recipient: var("CONTACT_TO"),
            email_from: var("CONTACT_FROM"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
}

impl Config {
    /// Whether contact submissions can be delivered: a recipient is set and
    /// the selected provider has its credentials.
    pub fn contact_configured(&self) -> bool {
        self.contact.recipient.is_some() && self.email.has_credentials()
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,
    pub from: EmailAddressWithName,
    #[serde(default)]
    pub resend: ResendConfig,
    pub smtp: Option<SmtpConfig>,
}

impl EmailConfig {
    pub fn has_credentials(&self) -> bool {
        match self.provider {
            EmailProvider::Resend => self.resend.api_key.is_some(),
            EmailProvider::Smtp => self.smtp.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    #[default]
    Resend,
    Smtp,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResendConfig {
    pub api_key: Option<Sensitive<String>>,
    pub endpoint_override: Option<Url>,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub url: Sensitive<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: Option<EmailAddressWithName>,
    pub subject_prefix: String,
    #[serde(default)]
    pub expose_provider_errors: bool,
}
