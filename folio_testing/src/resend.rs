use std::{
    net::IpAddr,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

pub const EMAILS_ROUTE: &str = "/emails";

/// Local part of recipient addresses that the fake server refuses.
pub const REJECTED_LOCAL_PART: &str = "reject";

#[derive(Debug)]
pub struct FakeResend {
    api_key: String,
    sent: Mutex<Vec<SentEmail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub reply_to: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
}

impl FakeResend {
    pub fn new(api_key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            api_key: api_key.into(),
            sent: Default::default(),
        })
    }

    /// Emails accepted so far, oldest first.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

pub fn router(state: Arc<FakeResend>) -> Router<()> {
    Router::new()
        .route(EMAILS_ROUTE, routing::post(send_email))
        .with_state(state)
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting resend testing server on {host}:{port}");
    info!("Resend api base url: http://{host}:{port}/");
    info!("Api key: {api_key:?}");
    info!("Emails to {REJECTED_LOCAL_PART}@<any domain> are rejected with status 422");

    let router = router(FakeResend::new(api_key));

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

#[derive(Serialize)]
struct SendEmailResponse {
    id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status_code: u16,
    name: &'static str,
    message: String,
}

fn error(status: StatusCode, name: &'static str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        status_code: status.as_u16(),
        name,
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

async fn send_email(
    state: State<Arc<FakeResend>>,
    headers: HeaderMap,
    Json(email): Json<SentEmail>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == state.api_key);
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "restricted_api_key", "API key is invalid");
    }

    if email.to.is_empty() {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Missing `to` field.",
        );
    }

    if email
        .to
        .iter()
        .any(|to| to.split('@').next() == Some(REJECTED_LOCAL_PART))
    {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "The recipient has been rejected.",
        );
    }

    state.sent.lock().unwrap().push(email);

    Json(SendEmailResponse { id: Uuid::new_v4() }).into_response()
}
