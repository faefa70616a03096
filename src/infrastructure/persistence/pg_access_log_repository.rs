//! PostgreSQL implementation of the click audit log.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::NewClick;
use crate::domain::repositories::AccessLogRepository;
use crate::error::AppError;

/// Appends click audit rows to `link_clicks`.
pub struct PgAccessLogRepository {
    pool: Arc<PgPool>,
}

impl PgAccessLogRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessLogRepository for PgAccessLogRepository {
    async fn create(&self, click: NewClick) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO link_clicks (link_id, ip, user_agent, referer, clicked_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(click.link_id)
        .bind(&click.ip)
        .bind(&click.user_agent)
        .bind(&click.referer)
        .bind(click.clicked_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
