//! Repository trait for click audit rows.

use crate::domain::entities::NewClick;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the click audit log.
///
/// Written only by the stats pipeline; one row per raw click event.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccessLogRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLogRepository: Send + Sync {
    /// Appends one audit row.
    async fn create(&self, click: NewClick) -> Result<(), AppError>;
}
