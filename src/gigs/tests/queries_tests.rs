// src/gigs/tests/queries_tests.rs
//
// Lifecycle queries exercised against an in-memory SQLite database.
// These cover the race-sensitive transitions: a conditional write that
// finds its precondition gone must affect zero rows and leave the gig
// untouched.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::common::migrations;
use crate::gigs::lifecycle::{GigStatus, PaymentStatus};
use crate::gigs::queries;

const POSTER: &str = "U_POSTER";
const WRITER_A: &str = "U_WRTRA1";
const WRITER_B: &str = "U_WRTRB1";
const GIG: &str = "G_TEST01";

async fn test_pool() -> SqlitePool {
    // Single connection so every handle sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    migrations::run_migrations(&pool).await.expect("migrations");
    pool
}

async fn seed_gig(pool: &SqlitePool) {
    queries::insert_gig(
        pool,
        GIG,
        "Edit a 500-word essay",
        "Tighten the argument and fix grammar.",
        25.0,
        "2025-01-01",
        POSTER,
    )
    .await
    .expect("seed gig");
}

#[tokio::test]
async fn test_create_then_read_round_trip() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    let gig = queries::fetch_gig(&pool, GIG)
        .await
        .expect("fetch")
        .expect("gig exists");

    assert_eq!(gig.title, "Edit a 500-word essay");
    assert_eq!(gig.description, "Tighten the argument and fix grammar.");
    assert_eq!(gig.price, 25.0);
    assert_eq!(gig.deadline, "2025-01-01");
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Available));
    assert_eq!(gig.payment(), Some(PaymentStatus::Unpaid));
    assert_eq!(gig.posted_by.as_deref(), Some(POSTER));
    assert!(gig.claimed_by.is_none());
    assert!(gig.submission.is_none());
}

#[tokio::test]
async fn test_claim_is_first_writer_wins() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    let first = queries::claim_gig(&pool, GIG, WRITER_A).await.unwrap();
    assert_eq!(first, 1);

    let second = queries::claim_gig(&pool, GIG, WRITER_B).await.unwrap();
    assert_eq!(second, 0, "losing claim must not overwrite the winner");

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.claimed_by.as_deref(), Some(WRITER_A));
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Claimed));
}

#[tokio::test]
async fn test_racing_claims_have_exactly_one_winner() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    let (a, b) = tokio::join!(
        queries::claim_gig(&pool, GIG, WRITER_A),
        queries::claim_gig(&pool, GIG, WRITER_B),
    );

    let wins = a.unwrap() + b.unwrap();
    assert_eq!(wins, 1, "exactly one concurrent claim may succeed");

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert!(gig.claimed_by.is_some());
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Claimed));
}

#[tokio::test]
async fn test_apply_is_idempotent() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    let first = queries::add_applicant(&pool, GIG, WRITER_A, "a@example.com")
        .await
        .unwrap();
    assert_eq!(first, 1);

    let repeat = queries::add_applicant(&pool, GIG, WRITER_A, "a@example.com")
        .await
        .unwrap();
    assert_eq!(repeat, 0, "re-applying is a no-op");

    let applicants = queries::fetch_applicants(&pool, GIG).await.unwrap();
    assert_eq!(applicants.len(), 1);
    assert_eq!(applicants[0].user_id, WRITER_A);
}

#[tokio::test]
async fn test_apply_after_claim_is_noop() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    queries::claim_gig(&pool, GIG, WRITER_A).await.unwrap();

    let inserted = queries::add_applicant(&pool, GIG, WRITER_B, "b@example.com")
        .await
        .unwrap();
    assert_eq!(inserted, 0, "claimed gigs accept no new applicants");

    let applicants = queries::fetch_applicants(&pool, GIG).await.unwrap();
    assert!(applicants.is_empty());
}

#[tokio::test]
async fn test_claim_clears_applicant_set() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    queries::add_applicant(&pool, GIG, WRITER_A, "a@example.com")
        .await
        .unwrap();
    queries::add_applicant(&pool, GIG, WRITER_B, "b@example.com")
        .await
        .unwrap();

    queries::claim_gig(&pool, GIG, "U_WRTRC1").await.unwrap();

    let applicants = queries::fetch_applicants(&pool, GIG).await.unwrap();
    assert!(
        applicants.is_empty(),
        "applicants must be empty once claimed_by is set"
    );
}

#[tokio::test]
async fn test_approve_applicant_assigns_and_clears() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    queries::add_applicant(&pool, GIG, WRITER_A, "a@example.com")
        .await
        .unwrap();
    queries::add_applicant(&pool, GIG, WRITER_B, "b@example.com")
        .await
        .unwrap();

    let assigned = queries::approve_applicant(&pool, GIG, WRITER_A).await.unwrap();
    assert_eq!(assigned, 1);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.claimed_by.as_deref(), Some(WRITER_A));
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Claimed));
    assert!(queries::fetch_applicants(&pool, GIG).await.unwrap().is_empty());

    // The other applicant can no longer be approved.
    let late = queries::approve_applicant(&pool, GIG, WRITER_B).await.unwrap();
    assert_eq!(late, 0);
}

#[tokio::test]
async fn test_approve_applicant_requires_membership() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    // Never applied.
    let assigned = queries::approve_applicant(&pool, GIG, WRITER_B).await.unwrap();
    assert_eq!(assigned, 0);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Available));
    assert!(gig.claimed_by.is_none());
}

#[tokio::test]
async fn test_submission_requires_claimant() {
    let pool = test_pool().await;
    seed_gig(&pool).await;
    queries::claim_gig(&pool, GIG, WRITER_A).await.unwrap();

    let by_stranger = queries::record_submission(&pool, GIG, WRITER_B, "https://x/doc.pdf")
        .await
        .unwrap();
    assert_eq!(by_stranger, 0);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Claimed));
    assert!(gig.submission.is_none(), "failed submit leaves gig unchanged");

    let by_claimant = queries::record_submission(&pool, GIG, WRITER_A, "https://x/doc.pdf")
        .await
        .unwrap();
    assert_eq!(by_claimant, 1);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Submitted));
    assert_eq!(gig.submission.as_deref(), Some("https://x/doc.pdf"));
}

#[tokio::test]
async fn test_submission_requires_claimed_status() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    let recorded = queries::record_submission(&pool, GIG, WRITER_A, "https://x/doc.pdf")
        .await
        .unwrap();
    assert_eq!(recorded, 0, "cannot submit on an available gig");
}

#[tokio::test]
async fn test_approve_only_from_submitted() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    assert_eq!(queries::approve_gig(&pool, GIG).await.unwrap(), 0);

    queries::claim_gig(&pool, GIG, WRITER_A).await.unwrap();
    assert_eq!(queries::approve_gig(&pool, GIG).await.unwrap(), 0);

    queries::record_submission(&pool, GIG, WRITER_A, "https://x/doc.pdf")
        .await
        .unwrap();
    assert_eq!(queries::approve_gig(&pool, GIG).await.unwrap(), 1);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Approved));
}

#[tokio::test]
async fn test_mark_paid_only_after_approval() {
    let pool = test_pool().await;
    seed_gig(&pool).await;
    queries::claim_gig(&pool, GIG, WRITER_A).await.unwrap();
    queries::record_submission(&pool, GIG, WRITER_A, "https://x/doc.pdf")
        .await
        .unwrap();

    // Still submitted: payment is out of order.
    assert_eq!(queries::mark_paid(&pool, GIG).await.unwrap(), 0);
    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.payment(), Some(PaymentStatus::Unpaid));

    queries::approve_gig(&pool, GIG).await.unwrap();
    assert_eq!(queries::mark_paid(&pool, GIG).await.unwrap(), 1);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.payment(), Some(PaymentStatus::Paid));

    // Paying twice finds nothing left to pay.
    assert_eq!(queries::mark_paid(&pool, GIG).await.unwrap(), 0);
}

#[tokio::test]
async fn test_attach_completed_work_requires_approved() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    assert_eq!(
        queries::attach_completed_work(&pool, GIG, "https://x/final.pdf")
            .await
            .unwrap(),
        0
    );

    queries::claim_gig(&pool, GIG, WRITER_A).await.unwrap();
    queries::record_submission(&pool, GIG, WRITER_A, "https://x/doc.pdf")
        .await
        .unwrap();
    queries::approve_gig(&pool, GIG).await.unwrap();

    assert_eq!(
        queries::attach_completed_work(&pool, GIG, "https://x/final.pdf")
            .await
            .unwrap(),
        1
    );

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.completed_work.as_deref(), Some("https://x/final.pdf"));
}

#[tokio::test]
async fn test_delete_removes_gig_and_applicants() {
    let pool = test_pool().await;
    seed_gig(&pool).await;
    queries::add_applicant(&pool, GIG, WRITER_A, "a@example.com")
        .await
        .unwrap();

    let deleted = queries::delete_gig(&pool, GIG).await.unwrap();
    assert_eq!(deleted, 1);

    assert!(queries::fetch_gig(&pool, GIG).await.unwrap().is_none());
    assert!(queries::fetch_applicants(&pool, GIG).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_full_lifecycle_end_to_end() {
    let pool = test_pool().await;
    seed_gig(&pool).await;

    // Writer applies, poster approves the applicant.
    queries::add_applicant(&pool, GIG, WRITER_A, "a@example.com")
        .await
        .unwrap();
    assert_eq!(queries::approve_applicant(&pool, GIG, WRITER_A).await.unwrap(), 1);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Claimed));
    assert_eq!(gig.claimed_by.as_deref(), Some(WRITER_A));
    assert!(queries::fetch_applicants(&pool, GIG).await.unwrap().is_empty());

    // Writer submits, poster approves and pays.
    assert_eq!(
        queries::record_submission(&pool, GIG, WRITER_A, "https://files/doc.pdf")
            .await
            .unwrap(),
        1
    );
    assert_eq!(queries::approve_gig(&pool, GIG).await.unwrap(), 1);
    assert_eq!(queries::mark_paid(&pool, GIG).await.unwrap(), 1);

    let gig = queries::fetch_gig(&pool, GIG).await.unwrap().unwrap();
    assert_eq!(gig.lifecycle_status(), Some(GigStatus::Approved));
    assert_eq!(gig.payment(), Some(PaymentStatus::Paid));
    assert_eq!(gig.submission.as_deref(), Some("https://files/doc.pdf"));

    // claimed_by is set exactly in the assigned states; it stayed set.
    assert!(gig.lifecycle_status().unwrap().is_assigned());
    assert!(gig.claimed_by.is_some());
}
