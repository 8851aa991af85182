use std::sync::Arc;

use anyhow::{anyhow, Context};
use folio_config::{EmailConfig, EmailProvider};
use folio_email_contracts::{Email, EmailAck, EmailSendError, EmailService};
use folio_email_impl::{
    resend::{ResendEmailServiceConfig, ResendEmailServiceImpl},
    smtp::SmtpEmailServiceImpl,
};
use folio_extern_impl::resend::{ResendApiServiceConfig, ResendApiServiceImpl};
use tracing::{info, warn};

/// The email backend selected by `email.provider`.
#[derive(Debug, Clone)]
pub enum EmailProviderService {
    Resend(ResendEmailServiceImpl<ResendApiServiceImpl>),
    Smtp(SmtpEmailServiceImpl),
    /// The selected provider has no credentials.
    Disabled,
}

impl EmailProviderService {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

/// Set up the configured provider. Smtp servers are pinged right away.
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailProviderService> {
    match config.provider {
        EmailProvider::Resend => {
            let Some(api_key) = &config.resend.api_key else {
                warn!("No resend api key configured, emails cannot be sent");
                return Ok(EmailProviderService::Disabled);
            };

            let api_config = ResendApiServiceConfig::new(config.resend.endpoint_override.clone())
                .context("Invalid resend endpoint")?;

            Ok(EmailProviderService::Resend(ResendEmailServiceImpl::new(
                ResendApiServiceImpl::new(api_config),
                ResendEmailServiceConfig {
                    from: config.from.clone().into(),
                    api_key: Arc::new(api_key.clone()),
                },
            )))
        }
        EmailProvider::Smtp => {
            let Some(smtp) = &config.smtp else {
                warn!("No smtp url configured, emails cannot be sent");
                return Ok(EmailProviderService::Disabled);
            };

            let email = SmtpEmailServiceImpl::new(&smtp.url, config.from.clone())
                .context("Invalid smtp url")?;

            info!("Connecting to smtp server");
            email
                .ping()
                .await
                .context("Failed to connect to smtp server")?;

            Ok(EmailProviderService::Smtp(email))
        }
    }
}

impl EmailService for EmailProviderService {
    async fn send(&self, email: Email) -> Result<EmailAck, EmailSendError> {
        match self {
            Self::Resend(service) => service.send(email).await,
            Self::Smtp(service) => service.send(email).await,
            Self::Disabled => Err(anyhow!("No email provider configured").into()),
        }
    }
}
