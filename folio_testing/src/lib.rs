//! In-process fakes of the HTTP and SMTP services the backend talks to.

use std::net::{IpAddr, Ipv4Addr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use url::Url;

pub mod contact;
pub mod resend;
pub mod smtp;

/// Serve `router` on an ephemeral localhost port in a background task and
/// return its base url.
pub async fn spawn(router: Router<()>) -> anyhow::Result<Url> {
    let listener = TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .context("Failed to bind to an ephemeral port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move { axum::serve(listener, router).await });

    format!("http://{addr}/")
        .parse()
        .context("Failed to build base url")
}
