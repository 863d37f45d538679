use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::Claims;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Header carrying the authentication token, on requests and on the login
/// response.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authentication gate: extracts and verifies the token, attaching the
/// decoded claims to the handler. Never touches storage.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let keys = JwtKeys::from_ref(state);
        // Expired and tampered tokens share one client-facing rejection.
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser(claims))
    }
}
