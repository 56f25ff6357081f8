// src/gigs/handlers/workflow.rs
//
// Lifecycle transitions: apply, claim, approve an applicant, approve
// the finished work, mark paid. Each handler re-reads the gig, checks
// role/ownership against the current state, then issues the conditional
// write from `queries`; zero affected rows after a valid-looking read
// means the caller lost a race.

use axum::extract::{Extension, Path};
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{gig_response, load_gig, status_of};
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::gigs::lifecycle::{can_transition, GigStatus, PaymentStatus};
use crate::gigs::models::{ApproveApplicantRequest, GigResponse};
use crate::gigs::queries;

/// POST /api/gigs/:id/apply
///
/// Adds the caller to the applicant set. Re-applying, or applying to a
/// gig that was claimed in the meantime, is a quiet no-op rather than
/// an error.
pub async fn apply_to_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if gig.claimed_by.is_none() {
        let inserted = queries::add_applicant(&state.db, &gig_id, &authed.id, &authed.email)
            .await
            .map_err(ApiError::DatabaseError)?;

        if inserted > 0 {
            info!(
                user_id = %authed.id,
                gig_id = %gig_id,
                email = %safe_email_log(&authed.email),
                "Application recorded"
            );
        }
    }

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}

/// POST /api/gigs/:id/claim
///
/// First successful writer wins the gig; everyone else gets a conflict,
/// never a silent overwrite.
pub async fn claim_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;
    let status = status_of(&gig)?;

    if status.is_assigned() || gig.claimed_by.is_some() {
        warn!(
            user_id = %authed.id,
            gig_id = %gig_id,
            status = %gig.status,
            "Claim rejected: gig is no longer available"
        );
        return Err(ApiError::Conflict(
            "gig is no longer available".to_string(),
        ));
    }

    let claimed = queries::claim_gig(&state.db, &gig_id, &authed.id)
        .await
        .map_err(ApiError::DatabaseError)?;

    if claimed == 0 {
        // Another writer got there between our read and the write.
        return Err(ApiError::Conflict(
            "gig is no longer available".to_string(),
        ));
    }

    info!(user_id = %authed.id, gig_id = %gig_id, "Gig claimed");

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}

/// POST /api/gigs/:id/approve-applicant
///
/// The poster picks one applicant; the gig moves to claimed and the
/// applicant set empties atomically.
pub async fn approve_applicant(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
    Json(request): Json<ApproveApplicantRequest>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if !authed.can_manage(gig.posted_by.as_deref()) {
        return Err(ApiError::Unauthorized(
            "only the gig's poster or an admin may approve applicants".to_string(),
        ));
    }

    let status = status_of(&gig)?;
    if status.is_assigned() || gig.claimed_by.is_some() {
        return Err(ApiError::InvalidState(
            "gig already has an assigned writer".to_string(),
        ));
    }

    let applicants = queries::fetch_applicants(&state.db, &gig_id)
        .await
        .map_err(ApiError::DatabaseError)?;
    if !applicants.iter().any(|a| a.user_id == request.applicant_id) {
        // Guards against a stale view of the applicant list.
        return Err(ApiError::NotFound(
            "applicant not found for this gig".to_string(),
        ));
    }

    let assigned = queries::approve_applicant(&state.db, &gig_id, &request.applicant_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    if assigned == 0 {
        return Err(ApiError::Conflict(
            "gig was claimed by someone else first".to_string(),
        ));
    }

    info!(
        user_id = %authed.id,
        gig_id = %gig_id,
        applicant_id = %request.applicant_id,
        "Applicant approved and assigned"
    );

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}

/// POST /api/gigs/:id/approve
pub async fn approve_gig(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if !authed.can_manage(gig.posted_by.as_deref()) {
        return Err(ApiError::Unauthorized(
            "only the gig's poster or an admin may approve it".to_string(),
        ));
    }

    let status = status_of(&gig)?;
    if !can_transition(status, GigStatus::Approved) {
        return Err(ApiError::InvalidState(format!(
            "cannot approve a gig that is {}",
            status.as_str()
        )));
    }

    let approved = queries::approve_gig(&state.db, &gig_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    if approved == 0 {
        return Err(ApiError::Conflict(
            "gig state changed before approval".to_string(),
        ));
    }

    info!(user_id = %authed.id, gig_id = %gig_id, "Gig approved");

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}

/// POST /api/gigs/:id/pay
pub async fn mark_paid(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if !authed.can_manage(gig.posted_by.as_deref()) {
        return Err(ApiError::Unauthorized(
            "only the gig's poster or an admin may mark it paid".to_string(),
        ));
    }

    let status = status_of(&gig)?;
    if status != GigStatus::Approved {
        return Err(ApiError::InvalidState(format!(
            "cannot pay out a gig that is {}",
            status.as_str()
        )));
    }
    if gig.payment() == Some(PaymentStatus::Paid) {
        return Err(ApiError::InvalidState("gig is already paid".to_string()));
    }

    let paid = queries::mark_paid(&state.db, &gig_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    if paid == 0 {
        return Err(ApiError::Conflict(
            "gig state changed before payment".to_string(),
        ));
    }

    info!(user_id = %authed.id, gig_id = %gig_id, "Gig marked paid");

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}
