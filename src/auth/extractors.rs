//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::{Claims, Role, User};
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated caller, resolved from a bearer JWT.
///
/// Carries the identity every domain operation receives explicitly;
/// handlers never consult ambient session state. The role is the
/// resolved one: accounts on the bootstrap admin list act as admins
/// regardless of their stored role.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl AuthedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_post(&self) -> bool {
        self.role.can_post()
    }

    /// Owner-or-admin rule shared by gig management and approvals.
    pub fn can_manage(&self, posted_by: Option<&str>) -> bool {
        if self.is_admin() {
            return true;
        }
        self.role == Role::Poster && posted_by == Some(self.id.as_str())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthenticated("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthenticated("missing auth".into()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = if let Some(rest) = token.strip_prefix("Bearer ") {
            rest.to_string()
        } else {
            token
        };

        let decoded = match decode::<Claims>(
            &bare_token,
            &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                return Err(ApiError::Unauthenticated("invalid token".into()));
            }
        };

        let user_id = decoded.claims.sub;

        let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_optional(&app_state.db)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    user_id = %user_id,
                    "Database error during user lookup in authentication"
                );
                ApiError::DatabaseError(e)
            })?;

        match user {
            Some(u) => {
                let role = resolve_role(&u, &app_state.admin_emails);
                debug!(
                    user_id = %u.id,
                    email = %safe_email_log(&u.email),
                    role = %role.as_str(),
                    "Caller authenticated"
                );
                Ok(AuthedUser {
                    id: u.id,
                    email: u.email,
                    role,
                })
            }
            None => {
                warn!(user_id = %user_id, "Authentication failed: user not found in database");
                Err(ApiError::Unauthenticated("user not found".into()))
            }
        }
    }
}

/// Resolve the effective role for a user record.
pub fn resolve_role(user: &User, admin_emails: &std::collections::HashSet<String>) -> Role {
    if admin_emails.contains(&user.email.to_lowercase()) {
        Role::Admin
    } else {
        user.parsed_role()
    }
}
