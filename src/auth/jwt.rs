use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::id::UserId;
use crate::state::AppState;

/// Tokens are valid for one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Signing and verification keys derived from the process secret. The
/// secret is injected at construction time, never read from globals.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt_secret)
    }
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token bound to `user_id`, expiring `TOKEN_TTL_SECS` from now.
    pub fn sign(&self, user_id: &UserId) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc() + Duration::seconds(TOKEN_TTL_SECS);
        let claims = Claims {
            id: user_id.clone(),
            is_user: true,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Verify signature and expiry, returning the decoded claims. A
    /// tampered, malformed, or expired token all fail here.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}
