// src/gigs/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{manage, public, submissions, workflow};

/// Create the gigs router with all gig lifecycle routes
pub fn gigs_routes() -> Router {
    Router::new()
        // Browse routes
        .route("/api/gigs", get(public::list_gigs).post(manage::create_gig))
        .route("/api/my/gigs", get(public::my_gigs))
        .route(
            "/api/gigs/:id",
            get(public::get_gig)
                .put(manage::update_gig)
                .delete(manage::delete_gig),
        )
        // Lifecycle transitions
        .route("/api/gigs/:id/apply", post(workflow::apply_to_gig))
        .route("/api/gigs/:id/claim", post(workflow::claim_gig))
        .route(
            "/api/gigs/:id/approve-applicant",
            post(workflow::approve_applicant),
        )
        .route("/api/gigs/:id/approve", post(workflow::approve_gig))
        .route("/api/gigs/:id/pay", post(workflow::mark_paid))
        // Submissions and completed work
        .route("/api/gigs/:id/submit", post(submissions::submit_work))
        .route(
            "/api/gigs/:id/submit/upload",
            post(submissions::submit_work_upload),
        )
        .route(
            "/api/gigs/:id/completed-work",
            post(submissions::attach_completed_work),
        )
        // Locally stored blobs
        .route(
            "/api/files/:area/:gig_id/:filename",
            get(submissions::serve_file),
        )
}
