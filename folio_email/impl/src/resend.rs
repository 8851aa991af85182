use std::sync::Arc;

use folio_email_contracts::{Email, EmailAck, EmailSendError, EmailService};
use folio_extern_contracts::resend::{
    ResendApiService, ResendSendEmailRequest, ResendSendEmailResponse,
};
use folio_models::{email_address::EmailAddressWithName, Sensitive};
use tracing::debug;

/// Sends emails through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendEmailServiceImpl<Api> {
    api: Api,
    config: ResendEmailServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ResendEmailServiceConfig {
    pub from: Arc<EmailAddressWithName>,
    pub api_key: Arc<Sensitive<String>>,
}

impl<Api> ResendEmailServiceImpl<Api> {
    pub fn new(api: Api, config: ResendEmailServiceConfig) -> Self {
        Self { api, config }
    }
}

impl<Api> EmailService for ResendEmailServiceImpl<Api>
where
    Api: ResendApiService,
{
    async fn send(&self, email: Email) -> Result<EmailAck, EmailSendError> {
        let request = ResendSendEmailRequest {
            from: self.config.from.to_string(),
            to: vec![email.recipient.to_string()],
            subject: email.subject,
            reply_to: email.reply_to,
            text: email.text,
            html: email.html,
        };

        match self.api.send_email(&self.config.api_key, request).await? {
            ResendSendEmailResponse::Accepted { id } => {
                debug!(%id, "resend accepted email");
                Ok(EmailAck { id: Some(id) })
            }
            ResendSendEmailResponse::Rejected {
                status,
                name,
                message,
            } => Err(EmailSendError::Rejected(match name {
                Some(name) => format!("{name}: {message} (status {status})"),
                None => format!("{message} (status {status})"),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_extern_contracts::resend::MockResendApiService;

    use super::*;

    fn config() -> ResendEmailServiceConfig {
        ResendEmailServiceConfig {
            from: Arc::new("contact@example.com".parse().unwrap()),
            api_key: Arc::new("re_test_key".to_owned().into()),
        }
    }

    fn email() -> Email {
        Email {
            recipient: "me@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Hello there".into(),
            text: "This is a message".into(),
            html: Some("<p>This is a message</p>".into()),
            reply_to: Some("jo@x.com".into()),
        }
    }

    fn expected_request() -> ResendSendEmailRequest {
        ResendSendEmailRequest {
            from: "contact@example.com".into(),
            to: vec!["me@example.com".into()],
            subject: "Portfolio Contact: Hello there".into(),
            reply_to: Some("jo@x.com".into()),
            text: "This is a message".into(),
            html: Some("<p>This is a message</p>".into()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let api = MockResendApiService::new().with_send_email(
            "re_test_key".into(),
            expected_request(),
            ResendSendEmailResponse::Accepted { id: "abc".into() },
        );

        let sut = ResendEmailServiceImpl::new(api, config());

        // Act
        let result = sut.send(email()).await;

        // Assert
        assert_eq!(result.unwrap(), EmailAck { id: Some("abc".into()) });
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let api = MockResendApiService::new().with_send_email(
            "re_test_key".into(),
            expected_request(),
            ResendSendEmailResponse::Rejected {
                status: 422,
                name: Some("validation_error".into()),
                message: "Invalid `to` field.".into(),
            },
        );

        let sut = ResendEmailServiceImpl::new(api, config());

        // Act
        let result = sut.send(email()).await;

        // Assert
        match result {
            Err(EmailSendError::Rejected(detail)) => {
                assert_eq!(detail, "validation_error: Invalid `to` field. (status 422)")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_error() {
        // Arrange
        let mut api = MockResendApiService::new();
        api.expect_send_email()
            .once()
            .return_once(|_, _| Box::pin(std::future::ready(Err(anyhow::anyhow!("timeout")))));

        let sut = ResendEmailServiceImpl::new(api, config());

        // Act
        let result = sut.send(email()).await;

        // Assert
        assert!(matches!(result, Err(EmailSendError::Other(_))));
    }
}
