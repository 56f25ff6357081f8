// src/admin/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{dashboard, users};

/// Create the admin router with moderation routes
pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/users", get(users::get_users))
        .route(
            "/api/admin/poster-applications",
            get(users::get_poster_applications),
        )
        .route(
            "/api/admin/poster-applications/:user_id/decide",
            post(users::decide_poster_application),
        )
        .route("/api/admin/stats", get(dashboard::get_stats))
}
