// src/admin/models.rs

use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct DecideApplicationRequest {
    pub approve: bool,
}

/// Platform-wide counts for the admin dashboard.
#[derive(Serialize, Debug)]
pub struct DashboardStats {
    pub total_users: i64,
    pub writers: i64,
    pub posters: i64,
    pub admins: i64,
    pub pending_poster_applications: i64,
    pub total_gigs: i64,
    pub available_gigs: i64,
    pub claimed_gigs: i64,
    pub submitted_gigs: i64,
    pub approved_gigs: i64,
    pub paid_gigs: i64,
}
