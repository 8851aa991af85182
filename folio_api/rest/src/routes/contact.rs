use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_models::contact::ContactMessage;
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::{error, error_with_details};
use crate::models::{contact::ApiContactMessage, ApiOk};

pub const CONTACT_ROUTE: &str = "/api/contact";

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route(CONTACT_ROUTE, routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if !service.is_configured() {
        error!("Rejecting contact form submission: email service not configured");
        return not_configured();
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
        Err(rejection) => {
            debug!("Failed to read contact form body: {rejection}");
            return error(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    // `null` is accepted and treated like an empty object, arrays are not
    let message = serde_json::from_slice::<Option<Map<String, Value>>>(&body).and_then(|body| {
        serde_json::from_value::<ApiContactMessage>(body.unwrap_or_default().into())
    });
    let Ok(message) = message else {
        return error(StatusCode::BAD_REQUEST, "Invalid JSON body");
    };

    let message = match ContactMessage::try_from(message) {
        Ok(message) => message,
        Err(err) => return error(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    match service.send_message(message).await {
        Ok(()) => Json(ApiOk { ok: true }).into_response(),
        Err(ContactSendMessageError::NotConfigured) => not_configured(),
        Err(ContactSendMessageError::Send { details }) => error_with_details(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send email",
            details.as_deref(),
        ),
        Err(ContactSendMessageError::Other(err)) => {
            error!("Email service error: {err:#}");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Email service error")
        }
    }
}

fn not_configured() -> Response {
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Email service not configured",
    )
}
