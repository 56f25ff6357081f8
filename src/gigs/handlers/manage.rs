// src/gigs/handlers/manage.rs

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{gig_response, load_gig};
use crate::auth::AuthedUser;
use crate::common::{generate_gig_id, ApiError, AppState, Validator};
use crate::gigs::models::{CreateGigRequest, GigResponse, UpdateGigRequest};
use crate::gigs::queries;
use crate::gigs::validators::GigValidator;

/// POST /api/gigs - create a gig in available/unpaid state
pub async fn create_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateGigRequest>,
) -> Result<(StatusCode, Json<GigResponse>), ApiError> {
    let state = state_lock.read().await.clone();

    if !authed.can_post() {
        warn!(
            user_id = %authed.id,
            role = %authed.role.as_str(),
            "Gig creation denied: poster privileges required"
        );
        return Err(ApiError::Unauthorized(
            "poster privileges required".to_string(),
        ));
    }

    let validator = GigValidator {
        reject_past_deadlines: state.reject_past_deadlines,
    };
    let validation = validator.validate(&request);
    if !validation.is_valid() {
        return Err(ApiError::from(validation));
    }

    let gig_id = generate_gig_id();
    queries::insert_gig(
        &state.db,
        &gig_id,
        request.title.trim(),
        request.description.trim(),
        request.price,
        &request.deadline,
        &authed.id,
    )
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, gig_id = %gig_id, "Gig created");

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok((StatusCode::CREATED, Json(gig_response(&state.db, gig).await?)))
}

/// PUT /api/gigs/:id - edit descriptive fields, any lifecycle state
pub async fn update_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
    Json(request): Json<UpdateGigRequest>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if !authed.can_manage(gig.posted_by.as_deref()) {
        warn!(
            user_id = %authed.id,
            gig_id = %gig_id,
            "Gig update denied: not the owner or an admin"
        );
        return Err(ApiError::Unauthorized(
            "only the gig's poster or an admin may edit it".to_string(),
        ));
    }

    let validator = GigValidator {
        reject_past_deadlines: state.reject_past_deadlines,
    };
    let validation = validator.validate(&request);
    if !validation.is_valid() {
        return Err(ApiError::from(validation));
    }

    let title = request.title.as_deref().unwrap_or(&gig.title).trim();
    let description = request
        .description
        .as_deref()
        .unwrap_or(&gig.description)
        .trim();
    let price = request.price.unwrap_or(gig.price);
    let deadline = request.deadline.as_deref().unwrap_or(&gig.deadline);

    queries::update_gig_fields(&state.db, &gig_id, title, description, price, deadline)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, gig_id = %gig_id, "Gig updated");

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}

/// DELETE /api/gigs/:id - hard delete
pub async fn delete_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if !authed.can_manage(gig.posted_by.as_deref()) {
        warn!(
            user_id = %authed.id,
            gig_id = %gig_id,
            "Gig deletion denied: not the owner or an admin"
        );
        return Err(ApiError::Unauthorized(
            "only the gig's poster or an admin may delete it".to_string(),
        ));
    }

    let deleted = queries::delete_gig(&state.db, &gig_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    if deleted == 0 {
        // Someone else removed it between our read and the delete.
        return Err(ApiError::NotFound("gig not found".to_string()));
    }

    info!(user_id = %authed.id, gig_id = %gig_id, "Gig deleted");

    Ok(StatusCode::NO_CONTENT)
}
