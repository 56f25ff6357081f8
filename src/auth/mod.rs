//! # Auth Module
//!
//! Identity and role resolution:
//! - email/password sign-up and login (bcrypt + HS256 JWTs)
//! - `AuthedUser` extractor for protected routes
//! - poster-role applications (admin decisions live in the admin module)

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use extractors::AuthedUser;
pub use models::{Role, User};
pub use routes::auth_routes;
