// src/auth/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the auth router with account and session routes
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/me", get(handlers::me))
        .route(
            "/api/auth/poster-application",
            post(handlers::request_poster_role),
        )
}
