// src/admin/handlers/users.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::admin::models::DecideApplicationRequest;
use crate::auth::extractors::resolve_role;
use crate::auth::models::UserResponse;
use crate::auth::{AuthedUser, User};
use crate::common::{ApiError, AppState};

fn require_admin(authed: &AuthedUser, action: &str) -> Result<(), ApiError> {
    if !authed.is_admin() {
        warn!(
            user_id = %authed.id,
            action = %action,
            "Denied: admin privileges required"
        );
        return Err(ApiError::Unauthorized(
            "admin privileges required".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/admin/users - every account, credentials stripped
pub async fn get_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed, "list users")?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let responses = users
        .into_iter()
        .map(|u| {
            let role = resolve_role(&u, &state.admin_emails);
            UserResponse::from_user(u, role)
        })
        .collect();

    Ok(Json(responses))
}

/// GET /api/admin/poster-applications - accounts awaiting a decision
pub async fn get_poster_applications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed, "list poster applications")?;

    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE poster_application_status = 'pending' ORDER BY created_at",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let responses = users
        .into_iter()
        .map(|u| {
            let role = resolve_role(&u, &state.admin_emails);
            UserResponse::from_user(u, role)
        })
        .collect();

    Ok(Json(responses))
}

/// Apply an admin decision to a pending application. Conditional on the
/// application still being pending; a decision that finds nothing
/// pending affected zero rows.
pub(crate) async fn apply_decision(
    pool: &SqlitePool,
    user_id: &str,
    approve: bool,
) -> Result<u64, sqlx::Error> {
    let result = if approve {
        sqlx::query(
            r#"
            UPDATE users SET role = 'poster', poster_application_status = 'approved'
            WHERE id = ? AND poster_application_status = 'pending'
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?
    } else {
        // Rejection leaves the role untouched.
        sqlx::query(
            r#"
            UPDATE users SET poster_application_status = 'rejected'
            WHERE id = ? AND poster_application_status = 'pending'
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?
    };
    Ok(result.rows_affected())
}

/// POST /api/admin/poster-applications/:user_id/decide
pub async fn decide_poster_application(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
    Json(request): Json<DecideApplicationRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed, "decide poster application")?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if exists == 0 {
        return Err(ApiError::NotFound("user not found".to_string()));
    }

    let decided = apply_decision(&state.db, &user_id, request.approve)
        .await
        .map_err(ApiError::DatabaseError)?;

    if decided == 0 {
        return Err(ApiError::NotFound(
            "no pending poster application for this user".to_string(),
        ));
    }

    info!(
        admin_user_id = %authed.id,
        target_user_id = %user_id,
        approved = request.approve,
        "Poster application decided"
    );

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let role = resolve_role(&user, &state.admin_emails);
    Ok(Json(UserResponse::from_user(user, role)))
}
