use std::future::Future;

use folio_models::contact::ContactMessage;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Whether a recipient and an email provider are configured.
    ///
    /// Callers check this before even looking at a submission.
    fn is_configured(&self) -> bool;

    /// Deliver the message to the site owner. Makes at most one attempt.
    fn send_message(
        &self,
        message: ContactMessage,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("The contact form is not configured.")]
    NotConfigured,
    /// The email provider refused the message. `details` is only populated
    /// when provider errors may be shown to the client.
    #[error("Failed to send message.")]
    Send { details: Option<String> },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_is_configured(mut self, configured: bool) -> Self {
        self.expect_is_configured().return_const(configured);
        self
    }

    pub fn with_send_message(
        mut self,
        message: ContactMessage,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
