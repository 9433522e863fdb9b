//! Shared test helpers for storage module tests.

#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database on a single connection, so every query sees
/// the same database.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Inserts a minimal article and returns its id.
#[cfg(test)]
pub async fn create_test_article(pool: &SqlitePool, url: &str) -> i64 {
    create_test_article_at(pool, url, 1_704_067_200_000).await
}

/// Inserts a minimal article collected at `collected_at_ms`.
#[cfg(test)]
pub async fn create_test_article_at(pool: &SqlitePool, url: &str, collected_at_ms: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO articles (source, headline, url, collected_at_ms) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind("Test Source")
    .bind("Test headline with enough words")
    .bind(url)
    .bind(collected_at_ms)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test article")
}
