use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::response::error_envelope;

/// Every recoverable request failure. Handlers convert anything that goes
/// wrong into one of these; the `IntoResponse` impl is the single place an
/// error envelope is built, so nothing propagates past a handler uncaught.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Access denied.")]
    MissingToken,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_)
            | ApiError::InvalidToken
            | ApiError::InvalidCredentials
            | ApiError::Conflict(_)
            | ApiError::Storage(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // The unique email index arbitrates concurrent writes; its
        // rejection reaches the client as a 400 with the engine detail.
        ApiError::Storage(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "request rejected");
        (
            status,
            Json(error_envelope(status, Some(self.to_string()), None)),
        )
            .into_response()
    }
}
