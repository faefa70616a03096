//! PostgreSQL implementation of runtime settings.
//!
//! Settings live in a key/value table so operators can tune code-length
//! bounds without a redeploy. Missing or malformed values fall back to
//! the static configuration.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;

const KEY_MIN_CODE_LENGTH: &str = "min_code_length";
const KEY_MAX_CODE_LENGTH: &str = "max_code_length";

pub struct PgSettingsRepository {
    pool: Arc<PgPool>,
}

impl PgSettingsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn get_int(&self, key: &str) -> Result<Option<i32>, AppError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(self.pool.as_ref())
                .await?;

        match value {
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => {
                    warn!("Ignoring non-numeric setting {}='{}'", key, raw);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn min_code_length(&self) -> Result<Option<i32>, AppError> {
        self.get_int(KEY_MIN_CODE_LENGTH).await
    }

    async fn max_code_length(&self) -> Result<Option<i32>, AppError> {
        self.get_int(KEY_MAX_CODE_LENGTH).await
    }
}
