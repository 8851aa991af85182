use std::sync::Arc;

use folio_extern_contracts::resend::{
    ResendApiService, ResendSendEmailRequest, ResendSendEmailResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

const API_BASE_URL: &str = "https://api.resend.com/";

#[derive(Debug, Clone, Default)]
pub struct ResendApiServiceImpl {
    config: ResendApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ResendApiServiceConfig {
    emails_endpoint: Arc<Url>,
}

impl ResendApiServiceConfig {
    /// `base_url_override` replaces `https://api.resend.com/`, e.g. to point
    /// at a local fake server.
    pub fn new(base_url_override: Option<Url>) -> anyhow::Result<Self> {
        let base_url = match base_url_override {
            Some(url) => url,
            None => API_BASE_URL.parse()?,
        };

        Ok(Self {
            emails_endpoint: base_url.join("emails")?.into(),
        })
    }
}

impl Default for ResendApiServiceConfig {
    fn default() -> Self {
        Self::new(None).unwrap()
    }
}

impl ResendApiServiceImpl {
    pub fn new(config: ResendApiServiceConfig) -> Self {
        Self {
            config,
            client: Default::default(),
        }
    }
}

impl ResendApiService for ResendApiServiceImpl {
    async fn send_email(
        &self,
        api_key: &str,
        request: ResendSendEmailRequest,
    ) -> anyhow::Result<ResendSendEmailResponse> {
        let response = self
            .client
            .post((*self.config.emails_endpoint).clone())
            .bearer_auth(api_key)
            .json(&SendEmailRequest::from(&request))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let SendEmailResponse { id } = response.json().await?;
            return Ok(ResendSendEmailResponse::Accepted { id });
        }

        let body = response.text().await?;
        debug!(%status, %body, "resend api returned an error");

        Ok(match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => ResendSendEmailResponse::Rejected {
                status: status.as_u16(),
                name: error.name,
                message: error.message,
            },
            Err(_) => ResendSendEmailResponse::Rejected {
                status: status.as_u16(),
                name: None,
                message: status.to_string(),
            },
        })
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

impl<'a> From<&'a ResendSendEmailRequest> for SendEmailRequest<'a> {
    fn from(value: &'a ResendSendEmailRequest) -> Self {
        Self {
            from: &value.from,
            to: &value.to,
            subject: &value.subject,
            reply_to: value.reply_to.as_deref(),
            text: &value.text,
            html: value.html.as_deref(),
        }
    }
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    name: Option<String>,
    message: String,
}
