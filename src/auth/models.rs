//! Authentication and account data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Platform roles, lowest to highest privilege.
///
/// Every account starts as a writer; poster is granted through an
/// approved application; admin is assigned out-of-band (bootstrap
/// list or a prior admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Writer,
    Poster,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Writer => "writer",
            Role::Poster => "poster",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role string. Unknown values fall back to writer,
    /// the least-privileged role.
    pub fn parse(s: &str) -> Role {
        match s {
            "poster" => Role::Poster,
            "admin" => Role::Admin,
            _ => Role::Writer,
        }
    }

    /// Whether this role may create and manage its own gigs.
    pub fn can_post(&self) -> bool {
        matches!(self, Role::Poster | Role::Admin)
    }
}

/// Poster application lifecycle: pending until an admin decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl PosterApplicationStatus {
    pub fn parse(s: &str) -> Option<PosterApplicationStatus> {
        match s {
            "pending" => Some(PosterApplicationStatus::Pending),
            "approved" => Some(PosterApplicationStatus::Approved),
            "rejected" => Some(PosterApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub poster_application_status: Option<String>,
    pub created_at: Option<String>,
}

impl User {
    pub fn parsed_role(&self) -> Role {
        Role::parse(&self.role)
    }

    pub fn application_status(&self) -> Option<PosterApplicationStatus> {
        self.poster_application_status
            .as_deref()
            .and_then(PosterApplicationStatus::parse)
    }
}

/// Account view returned to callers; never carries credential material.
#[derive(Serialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub poster_application_status: Option<String>,
    pub created_at: Option<String>,
}

impl UserResponse {
    /// Build the caller-facing view with the role the platform actually
    /// resolved (bootstrap admins outrank their stored role).
    pub fn from_user(user: User, resolved_role: Role) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            role: resolved_role,
            poster_application_status: user.poster_application_status,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
