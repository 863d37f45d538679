use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Canonical reason phrase for the status codes this API emits.
pub fn http_error_reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown Error",
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    pub code: u16,
    pub status: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub status: &'static str,
    pub message: String,
    pub error: String,
}

pub fn success_envelope<T: Serialize>(code: StatusCode, data: T) -> SuccessEnvelope<T> {
    SuccessEnvelope {
        code: code.as_u16(),
        status: "success",
        data,
    }
}

/// Omitted message/error fall back to the canonical reason for `code`.
pub fn error_envelope(
    code: StatusCode,
    message: Option<String>,
    error: Option<String>,
) -> ErrorEnvelope {
    let reason = http_error_reason(code.as_u16());
    ErrorEnvelope {
        code: code.as_u16(),
        status: "error",
        message: message.unwrap_or_else(|| reason.to_string()),
        error: error.unwrap_or_else(|| reason.to_string()),
    }
}

/// Successful handler result. Every success body in the API goes through
/// this wrapper so raw data never leaves a handler.
pub struct ApiSuccess<T>(pub T);

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            Json(success_envelope(StatusCode::OK, self.0)),
        )
            .into_response()
    }
}
