//! Authentication and account handlers

use axum::extract::{Extension, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::extractors::{resolve_role, AuthedUser};
use super::models::{
    AuthResponse, Claims, LoginRequest, PosterApplicationStatus, SignupRequest, User, UserResponse,
};
use super::validators::CredentialsValidator;
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState, Validator};

/// Token lifetime: one week, matching the session length writers expect
/// between visits.
const TOKEN_TTL_DAYS: i64 = 7;

fn issue_token(user_id: &str, jwt_secret: &str) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        warn!(error = %e, "Failed to sign session token");
        ApiError::Unauthenticated("could not issue token".to_string())
    })
}

/// POST /api/auth/signup
///
/// Provisions a new account with the default writer role. The unique
/// email index makes concurrent first sign-ups resolve to at most one
/// record; the loser of that race sees a conflict, not a duplicate.
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = CredentialsValidator.validate(&request);
    if !validation.is_valid() {
        return Err(ApiError::from(validation));
    }

    let email = request.email.trim().to_lowercase();

    info!(email = %safe_email_log(&email), "Creating new account");

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST).map_err(|e| {
        warn!(error = %e, "Password hashing failed");
        ApiError::ValidationError("password could not be processed".to_string())
    })?;

    let id = generate_user_id();
    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (id, email, password_hash, role, created_at)
        VALUES (?, ?, ?, 'writer', datetime('now'))
        "#,
    )
    .bind(&id)
    .bind(&email)
    .bind(&password_hash)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if inserted.rows_affected() == 0 {
        warn!(email = %safe_email_log(&email), "Signup rejected: email already registered");
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let role = resolve_role(&user, &state.admin_emails);
    let token = issue_token(&user.id, &state.jwt_secret)?;

    info!(user_id = %user.id, "Account created");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from_user(user, role),
    }))
}

/// POST /api/auth/login
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let email = request.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = match user {
        Some(u) => u,
        None => {
            warn!(email = %safe_email_log(&email), "Login failed: unknown email");
            return Err(ApiError::Unauthenticated(
                "invalid email or password".to_string(),
            ));
        }
    };

    let password_ok = bcrypt::verify(&request.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthenticated(
            "invalid email or password".to_string(),
        ));
    }

    let role = resolve_role(&user, &state.admin_emails);
    let token = issue_token(&user.id, &state.jwt_secret)?;

    info!(user_id = %user.id, role = %role.as_str(), "Login successful");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from_user(user, role),
    }))
}

/// GET /api/auth/me - resolve the caller's account and effective role
pub async fn me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("account not found".to_string()))?;

    Ok(Json(UserResponse::from_user(user, authed.role)))
}

/// POST /api/auth/poster-application
///
/// A writer asks for poster privileges. The request parks the account
/// in `pending` until an admin decides; re-applying while pending or
/// after approval is rejected, re-applying after a rejection is allowed.
pub async fn request_poster_role(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    if authed.role.can_post() {
        return Err(ApiError::InvalidState(
            "account already has poster privileges".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("account not found".to_string()))?;

    match user.application_status() {
        Some(PosterApplicationStatus::Pending) => {
            return Err(ApiError::InvalidState(
                "poster application is already pending".to_string(),
            ));
        }
        Some(PosterApplicationStatus::Approved) => {
            return Err(ApiError::InvalidState(
                "poster application was already approved".to_string(),
            ));
        }
        Some(PosterApplicationStatus::Rejected) | None => {}
    }

    // Conditional write: a concurrent request that got there first
    // leaves nothing for this one to change.
    let updated = sqlx::query(
        r#"
        UPDATE users SET poster_application_status = 'pending'
        WHERE id = ? AND (poster_application_status IS NULL OR poster_application_status = 'rejected')
        "#,
    )
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::InvalidState(
            "poster application is already pending".to_string(),
        ));
    }

    info!(user_id = %authed.id, "Poster application submitted");

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let role = authed.role;
    Ok(Json(UserResponse::from_user(user, role)))
}
