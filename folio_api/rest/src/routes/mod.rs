use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiError;

pub mod contact;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn error(code: StatusCode, error: &str) -> Response {
    error_with_details(code, error, None)
}

fn error_with_details(code: StatusCode, error: &str, details: Option<&str>) -> Response {
    (code, Json(ApiError { error, details })).into_response()
}
