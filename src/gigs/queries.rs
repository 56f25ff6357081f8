// src/gigs/queries.rs
//! Gig lifecycle queries.
//!
//! Every state transition here is a conditional write keyed on the
//! expected prior state, so two callers racing on the same gig resolve
//! to exactly one winner; the loser sees zero affected rows and the
//! caller maps that to a conflict. Mutations that touch more than one
//! row (claiming also empties the applicant set) run in a transaction.

use sqlx::SqlitePool;

use super::models::{Applicant, Gig};

pub async fn fetch_gig(pool: &SqlitePool, gig_id: &str) -> Result<Option<Gig>, sqlx::Error> {
    sqlx::query_as::<_, Gig>("SELECT * FROM gigs WHERE id = ?")
        .bind(gig_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_applicants(
    pool: &SqlitePool,
    gig_id: &str,
) -> Result<Vec<Applicant>, sqlx::Error> {
    sqlx::query_as::<_, Applicant>(
        "SELECT user_id, email, applied_at FROM gig_applicants WHERE gig_id = ? ORDER BY applied_at",
    )
    .bind(gig_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_gig(
    pool: &SqlitePool,
    gig_id: &str,
    title: &str,
    description: &str,
    price: f64,
    deadline: &str,
    posted_by: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO gigs (id, title, description, price, deadline, status, payment_status,
                          posted_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'available', 'unpaid', ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(gig_id)
    .bind(title)
    .bind(description)
    .bind(price)
    .bind(deadline)
    .bind(posted_by)
    .execute(pool)
    .await?;
    Ok(())
}

/// Update descriptive fields only; the row's lifecycle columns are
/// deliberately not named here.
pub async fn update_gig_fields(
    pool: &SqlitePool,
    gig_id: &str,
    title: &str,
    description: &str,
    price: f64,
    deadline: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET title = ?, description = ?, price = ?, deadline = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(price)
    .bind(deadline)
    .bind(gig_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Hard delete; removes the applicant rows with the gig.
pub async fn delete_gig(pool: &SqlitePool, gig_id: &str) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM gig_applicants WHERE gig_id = ?")
        .bind(gig_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM gigs WHERE id = ?")
        .bind(gig_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

/// Add the caller to a gig's applicant set.
///
/// `INSERT OR IGNORE` makes a repeat application a no-op, and the
/// `WHERE EXISTS` guard keeps an application from landing on a gig that
/// was claimed between the caller's read and this write. Returns the
/// number of rows inserted (0 for either no-op).
pub async fn add_applicant(
    pool: &SqlitePool,
    gig_id: &str,
    user_id: &str,
    email: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO gig_applicants (gig_id, user_id, email, applied_at)
        SELECT ?1, ?2, ?3, datetime('now')
        WHERE EXISTS (SELECT 1 FROM gigs WHERE id = ?1 AND claimed_by IS NULL)
        "#,
    )
    .bind(gig_id)
    .bind(user_id)
    .bind(email)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// First writer wins; the row is only taken while still available and
/// unclaimed. Clearing the applicant set rides the same transaction so
/// no reader ever sees a claimed gig with applicants.
pub async fn claim_gig(
    pool: &SqlitePool,
    gig_id: &str,
    user_id: &str,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET status = 'claimed', claimed_by = ?, updated_at = datetime('now')
        WHERE id = ? AND status = 'available' AND claimed_by IS NULL
        "#,
    )
    .bind(user_id)
    .bind(gig_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() > 0 {
        sqlx::query("DELETE FROM gig_applicants WHERE gig_id = ?")
            .bind(gig_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(result.rows_affected())
}

/// Assign the gig to one applicant and clear the set. The guard
/// re-checks applicant membership inside the write, so a stale UI
/// holding a withdrawn applicant cannot assign them.
pub async fn approve_applicant(
    pool: &SqlitePool,
    gig_id: &str,
    applicant_id: &str,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET status = 'claimed', claimed_by = ?2, updated_at = datetime('now')
        WHERE id = ?1 AND status = 'available' AND claimed_by IS NULL
          AND EXISTS (SELECT 1 FROM gig_applicants WHERE gig_id = ?1 AND user_id = ?2)
        "#,
    )
    .bind(gig_id)
    .bind(applicant_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() > 0 {
        sqlx::query("DELETE FROM gig_applicants WHERE gig_id = ?")
            .bind(gig_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(result.rows_affected())
}

/// Record a submission reference. Only the claimant, only while claimed.
pub async fn record_submission(
    pool: &SqlitePool,
    gig_id: &str,
    user_id: &str,
    submission: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET status = 'submitted', submission = ?, updated_at = datetime('now')
        WHERE id = ? AND status = 'claimed' AND claimed_by = ?
        "#,
    )
    .bind(submission)
    .bind(gig_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn approve_gig(pool: &SqlitePool, gig_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET status = 'approved', updated_at = datetime('now')
        WHERE id = ? AND status = 'submitted'
        "#,
    )
    .bind(gig_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn mark_paid(pool: &SqlitePool, gig_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET payment_status = 'paid', updated_at = datetime('now')
        WHERE id = ? AND status = 'approved' AND payment_status = 'unpaid'
        "#,
    )
    .bind(gig_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Attach the final document the poster hands back to the writer.
pub async fn attach_completed_work(
    pool: &SqlitePool,
    gig_id: &str,
    url: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gigs
        SET completed_work = ?, updated_at = datetime('now')
        WHERE id = ? AND status = 'approved'
        "#,
    )
    .bind(url)
    .bind(gig_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
