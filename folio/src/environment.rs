use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::HeaderValue;
use folio_api_rest::{RestServer, RestServerConfig};
use folio_config::Config;
use folio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use folio_templates_impl::TemplateServiceImpl;
use tracing::warn;

use crate::email::EmailProviderService;

pub type ContactService = ContactServiceImpl<EmailProviderService, TemplateServiceImpl>;

pub fn rest_server(
    config: &Config,
    email: EmailProviderService,
) -> anyhow::Result<RestServer<ContactService>> {
    let contact = ContactServiceImpl::new(
        email,
        TemplateServiceImpl::default(),
        contact_service_config(config),
    );

    Ok(RestServer::new(contact, rest_server_config(config)?))
}

fn contact_service_config(config: &Config) -> Option<ContactServiceConfig> {
    if !config.contact_configured() {
        warn!("Contact form is not configured, every submission will be refused");
        return None;
    }

    Some(ContactServiceConfig {
        recipient: Arc::new(config.contact.recipient.clone()?),
        subject_prefix: config.contact.subject_prefix.as_str().into(),
        expose_provider_errors: config.contact.expose_provider_errors,
    })
}

fn rest_server_config(config: &Config) -> anyhow::Result<RestServerConfig> {
    let allowed_origins = config
        .http
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin {origin:?}"))
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(RestServerConfig {
        addr: SocketAddr::new(config.http.host, config.http.port),
        allowed_origins,
    })
}
