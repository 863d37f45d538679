use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// JWT payload used for authentication. Expiry is embedded in the token;
/// there is no server-side session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    #[serde(rename = "isUser")]
    pub is_user: bool,
    pub exp: usize, // expires at (unix timestamp)
}
