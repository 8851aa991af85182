use std::future::Future;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ResendApiService: Send + Sync + 'static {
    /// Submit an email to the Resend `POST /emails` endpoint.
    ///
    /// Transport failures and unreadable responses are returned as `Err`,
    /// while an error answered by the API itself is a
    /// [`ResendSendEmailResponse::Rejected`].
    fn send_email(
        &self,
        api_key: &str,
        request: ResendSendEmailRequest,
    ) -> impl Future<Output = anyhow::Result<ResendSendEmailResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendSendEmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub reply_to: Option<String>,
    pub text: String,
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendSendEmailResponse {
    Accepted {
        id: String,
    },
    Rejected {
        status: u16,
        name: Option<String>,
        message: String,
    },
}

#[cfg(feature = "mock")]
impl MockResendApiService {
    pub fn with_send_email(
        mut self,
        api_key: String,
        request: ResendSendEmailRequest,
        result: ResendSendEmailResponse,
    ) -> Self {
        self.expect_send_email()
            .once()
            .with(
                mockall::predicate::eq(api_key),
                mockall::predicate::eq(request),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
