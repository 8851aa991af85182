use std::future::Future;

/// Client for the contact form submission endpoint.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Post the form once. Any non-2xx answer is an error.
    fn submit(
        &self,
        request: ContactApiRequest,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactApiRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[cfg(feature = "mock")]
impl MockContactApiService {
    pub fn with_submit(mut self, request: ContactApiRequest, ok: bool) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(move |_| {
                Box::pin(std::future::ready(if ok {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("contact endpoint answered with 500"))
                }))
            });
        self
    }
}
