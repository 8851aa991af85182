use std::sync::Arc;

use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_email_contracts::{Email, EmailAck, EmailSendError, EmailService};
use folio_models::{
    contact::{ContactMessage, ContactMessageAuthor},
    email_address::EmailAddressWithName,
};
use folio_templates_contracts::{ContactMessageTemplate, TemplateService};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: Option<ContactServiceConfig>,
}

/// `None` in [`ContactServiceImpl::new`] means the recipient or the provider
/// credentials are missing and every submission is refused.
#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub recipient: Arc<EmailAddressWithName>,
    pub subject_prefix: Arc<str>,
    pub expose_provider_errors: bool,
}

impl<EmailS, Template> ContactServiceImpl<EmailS, Template> {
    pub fn new(email: EmailS, template: Template, config: Option<ContactServiceConfig>) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, Template> ContactService for ContactServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        let Some(config) = &self.config else {
            error!("Cannot send contact message: email service not configured");
            return Err(ContactSendMessageError::NotConfigured);
        };

        let ContactMessage {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        } = message;

        let html = self.template.render(&ContactMessageTemplate {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: content.to_string(),
        })?;

        let text = format!(
            "New contact message from {} <{}>\n\nSubject: {}\n\nMessage:\n{}",
            *name, *email, *subject, *content
        );

        let email = Email {
            recipient: (*config.recipient).clone(),
            subject: format!("{}{}", config.subject_prefix, *subject),
            text,
            html: Some(html),
            reply_to: Some(email.into_inner()),
        };

        match self.email.send(email).await {
            Ok(EmailAck { id }) => {
                info!(?id, "Contact message sent");
                Ok(())
            }
            Err(EmailSendError::Rejected(detail)) => {
                warn!(%detail, "Email provider rejected contact message");
                Err(ContactSendMessageError::Send {
                    details: config.expose_provider_errors.then_some(detail),
                })
            }
            Err(EmailSendError::Other(err)) => {
                Err(err.context("Failed to send contact message").into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::MockEmailService;
    use folio_templates_contracts::MockTemplateService;
    use folio_utils::assert_matches;

    use super::*;

    type Sut = ContactServiceImpl<MockEmailService, MockTemplateService>;

    fn config() -> ContactServiceConfig {
        ContactServiceConfig {
            recipient: Arc::new("contact@example.com".parse().unwrap()),
            subject_prefix: "Portfolio Contact: ".into(),
            expose_provider_errors: false,
        }
    }

    fn message() -> ContactMessage {
        ContactMessage::new(
            "Max Mustermann",
            "max.mustermann@example.de",
            "Hello there",
            "Hello World!\nHow are you?",
        )
        .unwrap()
    }

    fn template() -> MockTemplateService {
        MockTemplateService::new().with_render(
            ContactMessageTemplate {
                name: "Max Mustermann".into(),
                email: "max.mustermann@example.de".into(),
                subject: "Hello there".into(),
                message: "Hello World!\nHow are you?".into(),
            },
            "<h2>New contact message</h2>".into(),
        )
    }

    fn expected_email(config: &ContactServiceConfig) -> Email {
        Email {
            recipient: (*config.recipient).clone(),
            subject: "Portfolio Contact: Hello there".into(),
            text: "New contact message from Max Mustermann <max.mustermann@example.de>\n\n\
                   Subject: Hello there\n\n\
                   Message:\n\
                   Hello World!\nHow are you?"
                .into(),
            html: Some("<h2>New contact message</h2>".into()),
            reply_to: Some("max.mustermann@example.de".into()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let config = config();

        let email = MockEmailService::new().with_send(
            expected_email(&config),
            Ok(EmailAck {
                id: Some("49a3999c-0ce1-4ea6-ab68-afcd6dc2e794".into()),
            }),
        );

        let sut = ContactServiceImpl::new(email, template(), Some(config));

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn subject_prefix_is_configurable() {
        // Arrange
        let config = ContactServiceConfig {
            subject_prefix: "[folio] ".into(),
            ..config()
        };

        let email = MockEmailService::new().with_send(
            Email {
                subject: "[folio] Hello there".into(),
                ..expected_email(&config)
            },
            Ok(EmailAck::default()),
        );

        let sut = ContactServiceImpl::new(email, template(), Some(config));

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let config = config();

        let email = MockEmailService::new().with_send(
            expected_email(&config),
            Err("validation_error: domain not verified".into()),
        );

        let sut = ContactServiceImpl::new(email, template(), Some(config));

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send { details: None }));
    }

    #[tokio::test]
    async fn rejected_with_details() {
        // Arrange
        let config = ContactServiceConfig {
            expose_provider_errors: true,
            ..config()
        };

        let email = MockEmailService::new().with_send(
            expected_email(&config),
            Err("validation_error: domain not verified".into()),
        );

        let sut = ContactServiceImpl::new(email, template(), Some(config));

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSendMessageError::Send { details: Some(details) })
                if details == "validation_error: domain not verified"
        );
    }

    #[tokio::test]
    async fn provider_failure() {
        // Arrange
        let mut email = MockEmailService::new();
        email.expect_send().once().return_once(|_| {
            Box::pin(std::future::ready(Err(EmailSendError::Other(
                anyhow::anyhow!("connection reset"),
            ))))
        });

        let sut = ContactServiceImpl::new(email, template(), Some(config()));

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Other(_)));
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let sut: Sut =
            ContactServiceImpl::new(MockEmailService::new(), MockTemplateService::new(), None);

        // Act
        let configured = sut.is_configured();
        let result = sut.send_message(message()).await;

        // Assert
        assert!(!configured);
        assert_matches!(result, Err(ContactSendMessageError::NotConfigured));
    }

    #[tokio::test]
    async fn duplicate_messages_are_sent_twice() {
        // Arrange
        let config = config();

        let mut email = MockEmailService::new();
        email
            .expect_send()
            .times(2)
            .with(mockall::predicate::eq(expected_email(&config)))
            .returning(|_| Box::pin(std::future::ready(Ok(EmailAck::default()))));

        let mut template = MockTemplateService::new();
        template
            .expect_render::<ContactMessageTemplate>()
            .times(2)
            .returning(|_| Ok("<h2>New contact message</h2>".into()));

        let sut = ContactServiceImpl::new(email, template, Some(config));

        // Act
        let first = sut.send_message(message()).await;
        let second = sut.send_message(message()).await;

        // Assert
        assert!(sut.is_configured());
        first.unwrap();
        second.unwrap();
    }
}
