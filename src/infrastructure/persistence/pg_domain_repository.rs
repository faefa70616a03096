//! PostgreSQL implementation of the domain repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Domain;
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct DomainRow {
    id: i64,
    owner_id: i64,
    hostname: String,
    is_default: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DomainRow> for Domain {
    fn from(r: DomainRow) -> Self {
        Domain {
            id: r.id,
            owner_id: r.owner_id,
            hostname: r.hostname,
            is_default: r.is_default,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const DOMAIN_COLUMNS: &str =
    "id, owner_id, hostname, is_default, is_active, created_at, updated_at";

/// PostgreSQL repository for serving domains.
pub struct PgDomainRepository {
    pool: Arc<PgPool>,
}

impl PgDomainRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainRepository for PgDomainRepository {
    async fn find_by_id(&self, domain_id: i64) -> Result<Option<Domain>, AppError> {
        let row: Option<DomainRow> =
            sqlx::query_as(&format!("SELECT {DOMAIN_COLUMNS} FROM domains WHERE id = $1"))
                .bind(domain_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Into::into))
    }

    async fn get_default(&self, owner_id: i64) -> Result<Option<Domain>, AppError> {
        let row: Option<DomainRow> = sqlx::query_as(&format!(
            "SELECT {DOMAIN_COLUMNS} FROM domains \
             WHERE owner_id = $1 AND is_default AND is_active \
             ORDER BY id LIMIT 1"
        ))
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_active_by_name(&self, hostname: &str) -> Result<Vec<Domain>, AppError> {
        let rows: Vec<DomainRow> = sqlx::query_as(&format!(
            "SELECT {DOMAIN_COLUMNS} FROM domains \
             WHERE lower(hostname) = lower($1) AND is_active \
             ORDER BY id"
        ))
        .bind(hostname)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
