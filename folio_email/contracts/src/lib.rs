use std::future::Future;

use folio_models::email_address::EmailAddressWithName;
use thiserror::Error;

/// A transactional email provider.
///
/// Implementations make exactly one delivery attempt per call and never retry.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    fn send(&self, email: Email) -> impl Future<Output = Result<EmailAck, EmailSendError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    /// Raw address for the `Reply-To` header. Only shallowly validated, so
    /// backends with stricter address rules may refuse it.
    pub reply_to: Option<String>,
}

/// Acknowledgement of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailAck {
    /// Provider-assigned message id, if the provider reports one.
    pub id: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    /// The provider answered and refused to deliver the message.
    #[error("The email provider rejected the message: {0}")]
    Rejected(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<EmailAck, String>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| {
                Box::pin(std::future::ready(result.map_err(EmailSendError::Rejected)))
            });
        self
    }
}
