use sqlx::PgPool;
use time::OffsetDateTime;

use crate::id::UserId;

use super::dto::{NewUser, UserSummary, UserUpdate};
use super::repo_types::User;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, account_status, created_at, modified_at";

impl User {
    pub async fn find_by_id(db: &PgPool, id: &UserId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_summary_by_id(
        db: &PgPool,
        id: &UserId,
    ) -> Result<Option<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Listing shows ACTIVE accounts only, ascending by id (ids carry a
    /// creation-time prefix, so this is roughly oldest-first).
    pub async fn list_active(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, first_name, last_name
            FROM users
            WHERE account_status = 'ACTIVE'
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// Insert a new user; `password_hash` is the already-hashed secret.
    /// The unique email index rejects duplicates.
    pub async fn create(
        db: &PgPool,
        id: &UserId,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password, account_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&user.first_name)
        .bind(user.last_name.as_deref())
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.account_status.as_str())
        .fetch_one(db)
        .await
    }

    /// Apply a partial update; absent fields keep their stored value and
    /// `modified_at` is always refreshed. Returns the updated row, or
    /// `None` if the user no longer exists.
    pub async fn update(
        db: &PgPool,
        id: &UserId,
        changes: &UserUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                account_status = COALESCE($6, account_status),
                modified_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password.as_deref())
        .bind(changes.account_status.map(|s| s.as_str()))
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(db)
        .await
    }

    /// Hard delete. Returns the number of rows removed.
    pub async fn delete(db: &PgPool, id: &UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
