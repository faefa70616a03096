//! Repository trait for domain lookup.

use crate::domain::entities::Domain;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for domain records.
///
/// The engine only reads domains; domain CRUD is owned by the surrounding
/// application layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDomainRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Finds a domain by its database id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Domain>, AppError>;

    /// The active default domain for an owner scope (`owner_id = 0` for
    /// the system default).
    async fn get_default(&self, owner_id: i64) -> Result<Option<Domain>, AppError>;

    /// All active domains whose hostname exactly matches `name`.
    ///
    /// More than one row for the same name is a misconfiguration the
    /// resolver fails closed on.
    async fn find_active_by_name(&self, name: &str) -> Result<Vec<Domain>, AppError>;
}
