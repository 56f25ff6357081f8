// src/admin/handlers/dashboard.rs

use axum::{extract::Extension, Json};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::admin::models::DashboardStats;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64, ApiError> {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .map_err(ApiError::DatabaseError)
}

/// GET /api/admin/stats - platform-wide counts
pub async fn get_stats(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let state = state_lock.read().await.clone();

    if !authed.is_admin() {
        warn!(user_id = %authed.id, "Dashboard access denied: admin privileges required");
        return Err(ApiError::Unauthorized(
            "admin privileges required".to_string(),
        ));
    }

    let stats = DashboardStats {
        total_users: count(&state.db, "SELECT COUNT(*) FROM users").await?,
        writers: count(&state.db, "SELECT COUNT(*) FROM users WHERE role = 'writer'").await?,
        posters: count(&state.db, "SELECT COUNT(*) FROM users WHERE role = 'poster'").await?,
        admins: count(&state.db, "SELECT COUNT(*) FROM users WHERE role = 'admin'").await?,
        pending_poster_applications: count(
            &state.db,
            "SELECT COUNT(*) FROM users WHERE poster_application_status = 'pending'",
        )
        .await?,
        total_gigs: count(&state.db, "SELECT COUNT(*) FROM gigs").await?,
        available_gigs: count(
            &state.db,
            "SELECT COUNT(*) FROM gigs WHERE status = 'available'",
        )
        .await?,
        claimed_gigs: count(
            &state.db,
            "SELECT COUNT(*) FROM gigs WHERE status = 'claimed'",
        )
        .await?,
        submitted_gigs: count(
            &state.db,
            "SELECT COUNT(*) FROM gigs WHERE status = 'submitted'",
        )
        .await?,
        approved_gigs: count(
            &state.db,
            "SELECT COUNT(*) FROM gigs WHERE status = 'approved'",
        )
        .await?,
        paid_gigs: count(
            &state.db,
            "SELECT COUNT(*) FROM gigs WHERE payment_status = 'paid'",
        )
        .await?,
    };

    Ok(Json(stats))
}
