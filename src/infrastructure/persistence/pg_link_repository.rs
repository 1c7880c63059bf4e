//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Uniqueness is
/// enforced by the `links_short_key_key` and `links_original_url_key`
/// constraints.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    short_key: String,
    original_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.short_key, r.original_url, r.click_count, r.created_at)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_short_key(&self, short_key: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, short_key, original_url, click_count, created_at
            FROM links
            WHERE short_key = $1
            "#,
        )
        .bind(short_key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, short_key, original_url, click_count, created_at
            FROM links
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn exists_by_short_key(&self, short_key: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM links WHERE short_key = $1)",
        )
        .bind(short_key)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn save(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (short_key, original_url)
            VALUES ($1, $2)
            RETURNING id, short_key, original_url, click_count, created_at
            "#,
        )
        .bind(&new_link.short_key)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        tracing::debug!(short_key = %row.short_key, "Inserted link row {}", row.id);

        Ok(row.into())
    }

    async fn increment_click_count(&self, short_key: &str) -> Result<Option<Link>, AppError> {
        // Single-statement update: concurrent redirects never lose a click.
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE links
            SET click_count = click_count + 1
            WHERE short_key = $1
            RETURNING id, short_key, original_url, click_count, created_at
            "#,
        )
        .bind(short_key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
