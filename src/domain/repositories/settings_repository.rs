//! Repository trait for runtime setting overrides.

use crate::error::AppError;
use async_trait::async_trait;

/// Optional runtime overrides of the static code-length configuration.
///
/// `Ok(None)` means "no override, use the configured value". Lookup
/// failures are treated the same way by callers so a settings outage never
/// blocks link creation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSettingsRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Minimum generated-code length override.
    async fn min_code_length(&self) -> Result<Option<i32>, AppError>;

    /// Maximum generated-code length override.
    async fn max_code_length(&self) -> Result<Option<i32>, AppError>;
}
