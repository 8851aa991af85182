use std::sync::Arc;

use folio_extern_contracts::contact::{ContactApiRequest, ContactApiService};
use serde::Serialize;
use url::Url;

use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct ContactApiServiceImpl {
    config: ContactApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceConfig {
    pub endpoint: Arc<Url>,
}

impl ContactApiServiceImpl {
    pub fn new(config: ContactApiServiceConfig) -> Self {
        Self {
            config,
            client: Default::default(),
        }
    }
}

impl ContactApiService for ContactApiServiceImpl {
    async fn submit(&self, request: ContactApiRequest) -> anyhow::Result<()> {
        self.client
            .post((*self.config.endpoint).clone())
            .json(&SubmitRequest::from(&request))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

impl<'a> From<&'a ContactApiRequest> for SubmitRequest<'a> {
    fn from(value: &'a ContactApiRequest) -> Self {
        Self {
            name: &value.name,
            email: &value.email,
            subject: &value.subject,
            message: &value.message,
        }
    }
}
