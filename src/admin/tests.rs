//! Tests for admin module
//!
//! Covers the poster-application decision against an in-memory database:
//! approval grants the poster role, rejection leaves it alone, and a
//! decision with no pending application changes nothing.

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::admin::handlers::users::apply_decision;
    use crate::auth::User;
    use crate::common::migrations;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        pool
    }

    async fn seed_user(pool: &SqlitePool, id: &str, application_status: Option<&str>) {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, poster_application_status)
            VALUES (?, ?, 'x', 'writer', ?)
            "#,
        )
        .bind(id)
        .bind(format!("{}@example.com", id.to_lowercase()))
        .bind(application_status)
        .execute(pool)
        .await
        .expect("seed user");
    }

    async fn fetch_user(pool: &SqlitePool, id: &str) -> User {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .expect("user exists")
    }

    #[tokio::test]
    async fn test_approval_grants_poster_role() {
        let pool = test_pool().await;
        seed_user(&pool, "U_PEND01", Some("pending")).await;

        let decided = apply_decision(&pool, "U_PEND01", true).await.unwrap();
        assert_eq!(decided, 1);

        let user = fetch_user(&pool, "U_PEND01").await;
        assert_eq!(user.role, "poster");
        assert_eq!(user.poster_application_status.as_deref(), Some("approved"));
    }

    #[tokio::test]
    async fn test_rejection_keeps_role() {
        let pool = test_pool().await;
        seed_user(&pool, "U_PEND02", Some("pending")).await;

        let decided = apply_decision(&pool, "U_PEND02", false).await.unwrap();
        assert_eq!(decided, 1);

        let user = fetch_user(&pool, "U_PEND02").await;
        assert_eq!(user.role, "writer");
        assert_eq!(user.poster_application_status.as_deref(), Some("rejected"));
    }

    #[tokio::test]
    async fn test_decision_requires_pending_application() {
        let pool = test_pool().await;
        seed_user(&pool, "U_NONE01", None).await;
        seed_user(&pool, "U_DONE01", Some("approved")).await;

        assert_eq!(apply_decision(&pool, "U_NONE01", true).await.unwrap(), 0);
        assert_eq!(apply_decision(&pool, "U_DONE01", true).await.unwrap(), 0);

        // Nothing moved.
        let user = fetch_user(&pool, "U_NONE01").await;
        assert_eq!(user.role, "writer");
        assert!(user.poster_application_status.is_none());
    }

    #[tokio::test]
    async fn test_decision_is_single_shot() {
        let pool = test_pool().await;
        seed_user(&pool, "U_PEND03", Some("pending")).await;

        assert_eq!(apply_decision(&pool, "U_PEND03", false).await.unwrap(), 1);
        // The application was consumed; a second decision finds nothing.
        assert_eq!(apply_decision(&pool, "U_PEND03", true).await.unwrap(), 0);

        let user = fetch_user(&pool, "U_PEND03").await;
        assert_eq!(user.role, "writer");
        assert_eq!(user.poster_application_status.as_deref(), Some("rejected"));
    }
}
