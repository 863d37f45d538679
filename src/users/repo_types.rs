use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::id::UserId;

/// User record in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // bcrypt hash, never exposed in JSON
    pub account_status: String,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
}

/// Account lifecycle state. Stored as text; the validators and the table
/// CHECK constraint keep it inside this set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    #[default]
    Created,
    Active,
    Inactive,
    Suspended,
    Deleted,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown account status")]
pub struct ParseAccountStatusError;

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Created => "CREATED",
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Inactive => "INACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
            AccountStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ParseAccountStatusError;

    // Input is trimmed and uppercased before matching.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATED" => Ok(AccountStatus::Created),
            "ACTIVE" => Ok(AccountStatus::Active),
            "INACTIVE" => Ok(AccountStatus::Inactive),
            "SUSPENDED" => Ok(AccountStatus::Suspended),
            "DELETED" => Ok(AccountStatus::Deleted),
            _ => Err(ParseAccountStatusError),
        }
    }
}
