// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations.
///
/// Tables are created if missing. Setting `RESET_DB=true` drops
/// everything first; without it restarts preserve data.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
    }

    create_user_tables(pool).await?;
    create_gig_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP TABLE IF EXISTS gig_applicants")
        .execute(pool)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS gigs").execute(pool).await?;
    sqlx::query("DROP TABLE IF EXISTS users").execute(pool).await?;
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'writer',
            poster_application_status TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_gig_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gigs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL,
            deadline TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'available',
            payment_status TEXT NOT NULL DEFAULT 'unpaid',
            posted_by TEXT,
            claimed_by TEXT,
            submission TEXT,
            completed_work TEXT,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Composite primary key: a user appears in a gig's applicant set at
    // most once, and repeat applications become INSERT OR IGNORE no-ops.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gig_applicants (
            gig_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            email TEXT NOT NULL,
            applied_at TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (gig_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_gigs_status ON gigs(status)",
        "CREATE INDEX IF NOT EXISTS idx_gigs_posted_by ON gigs(posted_by)",
        "CREATE INDEX IF NOT EXISTS idx_gigs_claimed_by ON gigs(claimed_by)",
        "CREATE INDEX IF NOT EXISTS idx_applicants_gig ON gig_applicants(gig_id)",
        "CREATE INDEX IF NOT EXISTS idx_users_poster_application ON users(poster_application_status)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
