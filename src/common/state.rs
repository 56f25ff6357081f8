// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::services::StorageService;

/// Application state containing the database pool, blob storage, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    /// Bootstrap admin list; these emails resolve to the admin role
    /// even before any role row says so.
    pub admin_emails: HashSet<String>,
    /// Local blob directory, also used to serve files in local storage mode.
    pub submissions_dir: PathBuf,
    pub storage: Arc<StorageService>,
    /// Gate for the past-deadline rejection policy on gig creation.
    pub reject_past_deadlines: bool,
}
