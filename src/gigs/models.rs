// src/gigs/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lifecycle::{GigStatus, PaymentStatus};

// ============================================================================
// Gig Models
// ============================================================================

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Gig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Calendar date, stored as YYYY-MM-DD.
    pub deadline: String,
    pub status: String,
    pub payment_status: String,
    /// Nullable: legacy admin-created gigs had no recorded owner.
    pub posted_by: Option<String>,
    pub claimed_by: Option<String>,
    pub submission: Option<String>,
    pub completed_work: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Gig {
    pub fn lifecycle_status(&self) -> Option<GigStatus> {
        GigStatus::parse(&self.status)
    }

    pub fn payment(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}

/// One entry in a gig's applicant set.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Applicant {
    pub user_id: String,
    pub email: String,
    pub applied_at: Option<String>,
}

/// Gig plus its applicant set, as returned to callers.
#[derive(Serialize, Debug)]
pub struct GigResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub deadline: String,
    pub status: String,
    pub payment_status: String,
    pub posted_by: Option<String>,
    pub claimed_by: Option<String>,
    pub submission: Option<String>,
    pub completed_work: Option<String>,
    pub applicants: Vec<Applicant>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl GigResponse {
    pub fn from_parts(gig: Gig, applicants: Vec<Applicant>) -> Self {
        GigResponse {
            id: gig.id,
            title: gig.title,
            description: gig.description,
            price: gig.price,
            deadline: gig.deadline,
            status: gig.status,
            payment_status: gig.payment_status,
            posted_by: gig.posted_by,
            claimed_by: gig.claimed_by,
            submission: gig.submission,
            completed_work: gig.completed_work,
            applicants,
            created_at: gig.created_at,
            updated_at: gig.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateGigRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub deadline: String,
}

/// Descriptive fields only; lifecycle fields move through their own
/// operations and are never patchable here.
#[derive(Deserialize)]
pub struct UpdateGigRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub deadline: Option<String>,
}

#[derive(Deserialize)]
pub struct ApproveApplicantRequest {
    pub applicant_id: String,
}

/// Opaque submission reference: a URL from the blob store or inline text.
#[derive(Deserialize)]
pub struct SubmitWorkRequest {
    pub submission: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub gig: GigResponse,
}
