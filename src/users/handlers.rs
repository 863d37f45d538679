use axum::{
    extract::{FromRef, Path, Query, State},
    http::header::HeaderName,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::auth::extractors::{AuthUser, AUTH_TOKEN_HEADER};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::id::UserId;
use crate::pagination::{resolve_pagination, PageQuery};
use crate::response::ApiSuccess;
use crate::state::AppState;

use super::dto::{
    CreateUserRequest, LoginRequest, PublicUser, UpdateUserRequest, UserProfile, UserSummary,
};
use super::repo_types::User;

const MAX_PAGE_LIMIT: i64 = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users)
                .post(register)
                .put(update_profile)
                .delete(delete_account),
        )
        .route("/me", get(get_me))
        .route("/login", post(login))
        .route("/:id", get(get_user))
}

/// GET /me — the caller's own profile.
#[instrument(skip(state))]
async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let user = User::find_by_id(&state.db, &claims.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
    Ok(ApiSuccess(user.into()))
}

/// GET / — ACTIVE users, paginated, public projection.
#[instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiSuccess<Vec<UserSummary>>, ApiError> {
    let window = resolve_pagination(query.page(), query.limit(), MAX_PAGE_LIMIT);
    let users = User::list_active(&state.db, window.limit, window.offset).await?;
    Ok(ApiSuccess(users))
}

/// GET /:id — one user by id, public projection.
#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserSummary>, ApiError> {
    let id: UserId = id
        .parse()
        .map_err(|_| ApiError::Validation("Invalid Id.".into()))?;
    let user = User::find_summary_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
    Ok(ApiSuccess(user))
}

/// POST / — registration; anyone can sign up.
#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    let new_user = payload.validate()?;

    // Fast-path duplicate check for a friendlier message; the unique
    // email index arbitrates concurrent registrations.
    if User::find_by_email(&state.db, &new_user.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User email already registered.".into()));
    }

    let hash = hash_password(&new_user.password).map_err(|e| ApiError::Storage(e.to_string()))?;

    let id = UserId::generate();
    let user = User::create(&state.db, &id, &new_user, &hash).await?;
    info!(user_id = %user.id, "user registered");
    Ok(ApiSuccess(user.into()))
}

/// POST /login — issue a token in the response header on success.
#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let creds = payload.validate()?;

    // Unknown email and wrong password share one rejection so no
    // user-existence signal leaks.
    let user = User::find_by_email(&state.db, &creds.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let password_ok = match verify_password(&creds.password, &user.password) {
        Ok(ok) => ok,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "stored hash did not verify");
            false
        }
    };
    if !password_ok {
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state)
        .sign(&user.id)
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");
    Ok((
        [(HeaderName::from_static(AUTH_TOKEN_HEADER), token)],
        ApiSuccess(PublicUser::from(user)),
    ))
}

/// PUT / — partial update of the caller's own account.
#[instrument(skip(state, payload))]
async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let mut changes = payload.validate()?;

    if let Some(plain) = changes.password.take() {
        let hash = hash_password(&plain).map_err(|e| ApiError::Storage(e.to_string()))?;
        changes.password = Some(hash);
    }

    if let Some(email) = changes.email.as_deref() {
        // Fast-path collision check against other accounts; the unique
        // index still arbitrates races.
        if let Some(existing) = User::find_by_email(&state.db, email).await? {
            if existing.id != claims.id {
                return Err(ApiError::Conflict("Email not available.".into()));
            }
        }
    }

    let user = User::update(&state.db, &claims.id, &changes)
        .await?
        .ok_or_else(|| ApiError::Storage("User not updated.".into()))?;
    info!(user_id = %user.id, "user updated");
    Ok(ApiSuccess(user.into()))
}

/// DELETE / — hard-delete the caller's own account.
#[instrument(skip(state))]
async fn delete_account(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    let deleted = User::delete(&state.db, &claims.id).await?;
    if deleted == 0 {
        return Err(ApiError::Storage("Account not deleted.".into()));
    }
    info!(user_id = %claims.id, "account deleted");
    Ok(ApiSuccess("Account deleted."))
}
