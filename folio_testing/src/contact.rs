use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing, Json, Router};
use serde::Deserialize;

pub const CONTACT_ROUTE: &str = "/api/contact";

/// Stand-in for the contact endpoint that answers every submission with a
/// fixed status code.
#[derive(Debug)]
pub struct FakeContactEndpoint {
    status: StatusCode,
    received: Mutex<Vec<ReceivedSubmission>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReceivedSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FakeContactEndpoint {
    pub fn new(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            status,
            received: Default::default(),
        })
    }

    pub fn received(&self) -> Vec<ReceivedSubmission> {
        self.received.lock().unwrap().clone()
    }
}

pub fn router(state: Arc<FakeContactEndpoint>) -> Router<()> {
    Router::new()
        .route(CONTACT_ROUTE, routing::post(submit))
        .with_state(state)
}

async fn submit(
    state: State<Arc<FakeContactEndpoint>>,
    Json(submission): Json<ReceivedSubmission>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.received.lock().unwrap().push(submission);

    let body = if state.status.is_success() {
        serde_json::json!({ "ok": true })
    } else {
        serde_json::json!({ "error": "Failed to send email" })
    };
    (state.status, Json(body))
}
