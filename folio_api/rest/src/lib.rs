use std::net::SocketAddr;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use folio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;

/// Largest request body accepted, in bytes. Bigger bodies are answered with
/// `413 { error: "Request body too large" }`.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// Origins allowed to post the contact form from a browser. Empty
    /// disables CORS.
    pub allowed_origins: Vec<HeaderValue>,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::contact::router(self.contact.into()))
            .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        middlewares::cors::add(self.config.allowed_origins)(router)
    }
}
