//! Idempotent startup migration for the Postgres backend.

use sqlx::PgPool;

use crate::error::StorageError;

pub(crate) async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS blog_posts (
            slug TEXT PRIMARY KEY,
            view_count BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(())
}
