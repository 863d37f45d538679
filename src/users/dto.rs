use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;
use crate::id::UserId;

use super::repo_types::{AccountStatus, User};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn require(field: &str, value: Option<String>) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{field} is required.")))
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be between {min} and {max} characters."
        )));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ApiError> {
    check_len("email", email, 5, 255)?;
    if !is_valid_email(email) {
        return Err(ApiError::Validation(
            "email must be a valid email address.".into(),
        ));
    }
    Ok(())
}

fn parse_status(value: Option<String>) -> Result<Option<AccountStatus>, ApiError> {
    match value {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| {
            ApiError::Validation(
                "account_status must be one of CREATED, ACTIVE, INACTIVE, SUSPENDED, DELETED."
                    .into(),
            )
        }),
    }
}

/// Registration body. Fields are optional at the serde layer so the
/// validator, not the decoder, reports the first missing field by name.
/// Unknown fields are silently ignored.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub account_status: Option<String>,
}

#[derive(Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
    pub account_status: AccountStatus,
}

impl CreateUserRequest {
    /// First schema-rule failure wins; no error aggregation.
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let first_name = require("first_name", self.first_name)?;
        check_len("first_name", &first_name, 1, 255)?;
        if let Some(last_name) = &self.last_name {
            check_len("last_name", last_name, 1, 255)?;
        }
        let email = require("email", self.email)?;
        check_email(&email)?;
        let password = require("password", self.password)?;
        check_len("password", &password, 8, 1024)?;
        let account_status = parse_status(self.account_status)?.unwrap_or_default();
        Ok(NewUser {
            first_name,
            last_name: self.last_name,
            email,
            password,
            account_status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginCredentials, ApiError> {
        let email = require("email", self.email)?;
        check_email(&email)?;
        let password = require("password", self.password)?;
        check_len("password", &password, 8, 64)?;
        Ok(LoginCredentials { email, password })
    }
}

/// Partial update body: every field optional, create-shape rules apply to
/// whatever is present. Fields outside this set never reach storage.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub account_status: Option<String>,
}

#[derive(Debug, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub account_status: Option<AccountStatus>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserUpdate, ApiError> {
        if let Some(first_name) = &self.first_name {
            check_len("first_name", first_name, 1, 255)?;
        }
        if let Some(last_name) = &self.last_name {
            check_len("last_name", last_name, 1, 255)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(password) = &self.password {
            check_len("password", password, 8, 1024)?;
        }
        let account_status = parse_status(self.account_status)?;
        Ok(UserUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            account_status,
        })
    }
}

/// Subset returned by register and login.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// Subset returned by /me and profile updates.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub account_status: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            account_status: user.account_status,
        }
    }
}

/// Public projection used by the listing and by-id lookups.
#[derive(Debug, Serialize, FromRow)]
pub struct UserSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_create() -> CreateUserRequest {
        CreateUserRequest {
            first_name: Some("Test".into()),
            last_name: Some("User".into()),
            email: Some("testuser@example.com".into()),
            password: Some("root1234".into()),
            account_status: None,
        }
    }

    #[test]
    fn create_reports_missing_first_name_first() {
        let req = CreateUserRequest {
            first_name: None,
            last_name: None,
            email: None,
            password: None,
            account_status: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("first_name"));
    }

    #[test]
    fn create_reports_missing_email() {
        let req = CreateUserRequest {
            email: None,
            ..full_create()
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn create_reports_missing_password() {
        let req = CreateUserRequest {
            password: None,
            ..full_create()
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn create_rejects_bad_email_shape() {
        for email in ["plainaddress", "a@b", "white space@example.com"] {
            let req = CreateUserRequest {
                email: Some(email.into()),
                ..full_create()
            };
            let err = req.validate().unwrap_err();
            assert!(err.to_string().contains("email"), "accepted {email}");
        }
    }

    #[test]
    fn create_rejects_short_password() {
        let req = CreateUserRequest {
            password: Some("short".into()),
            ..full_create()
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn create_defaults_account_status() {
        let user = full_create().validate().unwrap();
        assert_eq!(user.account_status, AccountStatus::Created);
    }

    #[test]
    fn create_accepts_given_account_status() {
        let req = CreateUserRequest {
            account_status: Some("active".into()),
            ..full_create()
        };
        assert_eq!(req.validate().unwrap().account_status, AccountStatus::Active);
    }

    #[test]
    fn create_rejects_unknown_account_status() {
        let req = CreateUserRequest {
            account_status: Some("FROZEN".into()),
            ..full_create()
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("account_status"));
    }

    #[test]
    fn create_ignores_unknown_body_fields() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{
                "first_name": "Test",
                "email": "testuser@example.com",
                "password": "root1234",
                "is_admin": true
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_caps_password_at_64() {
        let req = LoginRequest {
            email: Some("testuser@example.com".into()),
            password: Some("x".repeat(65)),
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("password"));

        let req = LoginRequest {
            email: Some("testuser@example.com".into()),
            password: Some("x".repeat(64)),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_reports_missing_fields() {
        let err = LoginRequest {
            email: None,
            password: None,
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("email"));

        let err = LoginRequest {
            email: Some("testuser@example.com".into()),
            password: None,
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn update_accepts_empty_body() {
        let req = UpdateUserRequest {
            first_name: None,
            last_name: None,
            email: None,
            password: None,
            account_status: None,
        };
        let update = req.validate().unwrap();
        assert!(update.first_name.is_none());
        assert!(update.account_status.is_none());
    }

    #[test]
    fn update_checks_present_fields_only() {
        let req = UpdateUserRequest {
            first_name: Some(String::new()),
            last_name: None,
            email: None,
            password: None,
            account_status: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("first_name"));

        let req = UpdateUserRequest {
            first_name: None,
            last_name: None,
            email: Some("bad".into()),
            password: None,
            account_status: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn response_subsets_never_contain_password() {
        let user = User {
            id: UserId::generate(),
            first_name: "Test".into(),
            last_name: None,
            email: "testuser@example.com".into(),
            password: "$2b$10$hash".into(),
            account_status: "ACTIVE".into(),
            created_at: time::OffsetDateTime::now_utc(),
            modified_at: time::OffsetDateTime::now_utc(),
        };
        let public = serde_json::to_string(&PublicUser::from(user.clone())).unwrap();
        assert!(!public.contains("password"));
        let profile = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!profile.contains("password"));
        assert!(profile.contains("ACTIVE"));
    }
}
