use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

const ID_LEN: usize = 24;

/// Server-generated user identifier: 24 hex characters, a 4-byte unix
/// timestamp prefix followed by 8 random bytes. The timestamp prefix keeps
/// ids roughly sortable by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(String);

#[derive(Debug, thiserror::Error)]
#[error("invalid user id")]
pub struct ParseUserIdError;

impl UserId {
    pub fn generate() -> Self {
        let secs = OffsetDateTime::now_utc().unix_timestamp() as u32;
        let tail: u64 = rand::random();
        UserId(format!("{:08x}{:016x}", secs, tail))
    }

    pub fn is_valid(value: &str) -> bool {
        value.len() == ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseUserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(UserId(s.to_owned()))
        } else {
            Err(ParseUserIdError)
        }
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        let id = UserId::generate();
        assert!(UserId::is_valid(id.as_str()));
        assert_eq!(id.as_str().len(), 24);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(!UserId::is_valid(""));
        assert!(!UserId::is_valid("507f1f77bcf86cd79943901")); // 23 chars
        assert!(!UserId::is_valid("507f1f77bcf86cd7994390111")); // 25 chars
        assert!(!UserId::is_valid("507f1f77bcf86cd79943901z")); // non-hex
    }

    #[test]
    fn accepts_well_formed_ids() {
        assert!(UserId::is_valid("507f1f77bcf86cd799439011"));
        assert!(UserId::is_valid("507F1F77BCF86CD799439011"));
    }

    #[test]
    fn parse_roundtrip() {
        let id: UserId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
        assert!("not-an-id".parse::<UserId>().is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<UserId, _> = serde_json::from_str("\"507f1f77bcf86cd799439011\"");
        assert!(ok.is_ok());
        let bad: Result<UserId, _> = serde_json::from_str("\"oops\"");
        assert!(bad.is_err());
    }
}
