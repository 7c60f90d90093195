//! PostgreSQL storage backend using sqlx.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use viewtrack_core::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::traits::ViewStore;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ViewStore for PgStorage {
    async fn increment_views(&self, slug: &str) -> Result<(), StorageError> {
        // Single UPDATE, counter arithmetic happens inside Postgres. Zero
        // matched rows (unknown slug) is still success.
        sqlx::query("UPDATE blog_posts SET view_count = view_count + 1 WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn view_count(&self, slug: &str) -> Result<i64, StorageError> {
        sqlx::query_scalar::<_, i64>("SELECT view_count FROM blog_posts WHERE slug = $1")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    StorageError::NotFound { entity: "post", id: slug.to_owned() }
                },
                other => other.into(),
            })
    }

    async fn create_post(&self, slug: &str) -> Result<bool, StorageError> {
        let result =
            sqlx::query("INSERT INTO blog_posts (slug) VALUES ($1) ON CONFLICT (slug) DO NOTHING")
                .bind(slug)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }
}
