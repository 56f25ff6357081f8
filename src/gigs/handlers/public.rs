// src/gigs/handlers/public.rs

use axum::extract::{Extension, Path};
use axum::Json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::{gig_response, load_gig};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::gigs::models::{Applicant, Gig, GigResponse};

/// GET /api/gigs - list every gig with its applicant set
pub async fn list_gigs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
) -> Result<Json<Vec<GigResponse>>, ApiError> {
    let state = state_lock.read().await.clone();

    let gigs = sqlx::query_as::<_, Gig>("SELECT * FROM gigs ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    // One pass over all applicant rows instead of a query per gig.
    let rows = sqlx::query_as::<_, (String, String, String, Option<String>)>(
        "SELECT gig_id, user_id, email, applied_at FROM gig_applicants ORDER BY applied_at",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut by_gig: HashMap<String, Vec<Applicant>> = HashMap::new();
    for (gig_id, user_id, email, applied_at) in rows {
        by_gig.entry(gig_id).or_default().push(Applicant {
            user_id,
            email,
            applied_at,
        });
    }

    let responses = gigs
        .into_iter()
        .map(|gig| {
            let applicants = by_gig.remove(&gig.id).unwrap_or_default();
            GigResponse::from_parts(gig, applicants)
        })
        .collect();

    Ok(Json(responses))
}

/// GET /api/my/gigs - gigs posted by the caller
pub async fn my_gigs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<GigResponse>>, ApiError> {
    let state = state_lock.read().await.clone();

    if !authed.can_post() {
        return Err(ApiError::Unauthorized(
            "poster privileges required".to_string(),
        ));
    }

    info!(user_id = %authed.id, "Listing caller's posted gigs");

    let gigs = sqlx::query_as::<_, Gig>(
        "SELECT * FROM gigs WHERE posted_by = ? ORDER BY created_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut responses = Vec::with_capacity(gigs.len());
    for gig in gigs {
        responses.push(gig_response(&state.db, gig).await?);
    }

    Ok(Json(responses))
}

/// GET /api/gigs/:id
pub async fn get_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Path(gig_id): Path<String>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}
