// src/gigs/handlers/mod.rs

pub mod manage;
pub mod public;
pub mod submissions;
pub mod workflow;

use sqlx::SqlitePool;

use super::lifecycle::GigStatus;
use super::models::{Gig, GigResponse};
use super::queries;
use crate::common::ApiError;

/// Fetch a gig or report it absent.
pub(crate) async fn load_gig(pool: &SqlitePool, gig_id: &str) -> Result<Gig, ApiError> {
    queries::fetch_gig(pool, gig_id)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("gig not found".to_string()))
}

/// Resolve a stored status string into the state machine.
/// A row with an unrecognized status is unusable for transitions.
pub(crate) fn status_of(gig: &Gig) -> Result<GigStatus, ApiError> {
    gig.lifecycle_status().ok_or_else(|| {
        ApiError::InvalidState(format!("gig has unrecognized status '{}'", gig.status))
    })
}

/// Assemble the caller-facing view of one gig.
pub(crate) async fn gig_response(pool: &SqlitePool, gig: Gig) -> Result<GigResponse, ApiError> {
    let applicants = queries::fetch_applicants(pool, &gig.id)
        .await
        .map_err(ApiError::DatabaseError)?;
    Ok(GigResponse::from_parts(gig, applicants))
}
