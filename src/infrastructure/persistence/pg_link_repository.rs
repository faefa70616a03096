//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Row shape for the `links` table.
#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    owner_id: i64,
    domain_id: i64,
    code: String,
    original_url: String,
    title: Option<String>,
    content_hash: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            owner_id: r.owner_id,
            domain_id: r.domain_id,
            code: r.code,
            original_url: r.original_url,
            title: r.title,
            content_hash: r.content_hash,
            click_count: r.click_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const LINK_COLUMNS: &str = "id, owner_id, domain_id, code, original_url, title, content_hash, \
                            click_count, created_at, updated_at";

/// PostgreSQL repository for link storage and retrieval.
///
/// Unique indexes on `(domain_id, code)` and `(owner_id, domain_id,
/// content_hash)` are the sole concurrency-control mechanism for code
/// allocation; violations surface as [`AppError::Conflict`] via the
/// `From<sqlx::Error>` conversion.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row: LinkRow = sqlx::query_as(
            "INSERT INTO links (owner_id, domain_id, code, original_url, title, content_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, owner_id, domain_id, code, original_url, title, content_hash, \
                       click_count, created_at, updated_at",
        )
        .bind(new_link.owner_id)
        .bind(new_link.domain_id)
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .bind(&new_link.title)
        .bind(&new_link.content_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str, domain_id: i64) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1 AND domain_id = $2"
        ))
        .bind(code)
        .bind(domain_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_hash_owner_domain(
        &self,
        content_hash: &str,
        owner_id: i64,
        domain_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE content_hash = $1 AND owner_id = $2 AND domain_id = $3"
        ))
        .bind(content_hash)
        .bind(owner_id)
        .bind(domain_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_code_any_domain(
        &self,
        code: &str,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1 LIMIT $2"
        ))
        .bind(code)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn code_exists_in_domain(&self, code: &str, domain_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM links WHERE code = $1 AND domain_id = $2)",
        )
        .bind(code)
        .bind(domain_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn count_by_code_length(&self, length: i32) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE char_length(code) = $1")
                .bind(length)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let offset = (page - 1) * limit;

        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE owner_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete_by_owner(&self, owner_id: i64, code: &str) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(
            "DELETE FROM links WHERE owner_id = $1 AND code = $2 \
             RETURNING id, owner_id, domain_id, code, original_url, title, content_hash, \
                       click_count, created_at, updated_at",
        )
        .bind(owner_id)
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_clicks(&self, link_id: i64, by: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE links SET click_count = click_count + $2, updated_at = now() WHERE id = $1",
        )
        .bind(link_id)
        .bind(by)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
