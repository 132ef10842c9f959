use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Renders a use-case error as the shared JSON error body. Server-side
/// faults are masked; the callers' structured kinds pass through.
pub fn error_response(status: StatusCode, err: impl std::fmt::Display) -> Response {
    let message = if status.is_server_error() {
        "internal server error".to_string()
    } else {
        err.to_string()
    };

    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}
