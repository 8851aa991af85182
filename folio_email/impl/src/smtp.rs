use std::sync::Arc;

use anyhow::{anyhow, Context};
use folio_email_contracts::{Email, EmailAck, EmailSendError, EmailService};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::Apply;
use lettre::{
    message::{header::ContentType, Mailbox, MessageBuilder, MultiPart},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SmtpEmailServiceImpl {
    from: Arc<EmailAddressWithName>,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailServiceImpl {
    pub fn new(url: &str, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build();

        Ok(Self {
            from: from.into(),
            transport,
        })
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let reply_to = email
            .reply_to
            .map(|x| x.parse::<Mailbox>())
            .transpose()
            .context("Invalid reply-to address")?;

        let builder = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(reply_to, MessageBuilder::reply_to)
            .subject(email.subject);

        let message = match email.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(email.text, html)),
            None => builder.header(ContentType::TEXT_PLAIN).body(email.text),
        };

        message.context("Failed to build email")
    }
}

impl EmailService for SmtpEmailServiceImpl {
    async fn send(&self, email: Email) -> Result<EmailAck, EmailSendError> {
        let message = self.build_message(email)?;

        match self.transport.send(message).await {
            Ok(response) if response.is_positive() => {
                debug!(code = %response.code(), "smtp server accepted email");
                Ok(EmailAck::default())
            }
            Ok(response) => Err(EmailSendError::Rejected(format!(
                "smtp server answered {}",
                response.code()
            ))),
            Err(err) if err.is_permanent() => Err(EmailSendError::Rejected(err.to_string())),
            Err(err) => Err(anyhow::Error::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sut() -> SmtpEmailServiceImpl {
        SmtpEmailServiceImpl::new(
            "smtp://localhost:2525",
            "Portfolio Contact <contact@example.com>".parse().unwrap(),
        )
        .unwrap()
    }

    fn email(reply_to: &str) -> Email {
        Email {
            recipient: "me@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Hello there".into(),
            text: "This is a message".into(),
            html: Some("<p>This is a message</p>".into()),
            reply_to: Some(reply_to.into()),
        }
    }

    #[tokio::test]
    async fn build_multipart_message() {
        let message = sut().build_message(email("jo@x.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Reply-To: jo@x.com"));
        assert!(formatted.contains("Subject: Portfolio Contact: Hello there"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("This is a message"));
    }

    #[tokio::test]
    async fn invalid_reply_to_is_not_a_rejection() {
        let result = sut().send(email("not a mailbox")).await;

        assert!(matches!(result, Err(EmailSendError::Other(_))));
    }
}
