//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Code-allocation safety under concurrency rests entirely on the store's
/// unique constraints: `create` must fail with [`AppError::Conflict`] when
/// `(domain_id, code)` or the idempotency key `(owner_id, domain_id,
/// content_hash)` is already taken. Callers detect collisions, they never
/// prevent them with locks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on a unique-constraint violation
    /// (code taken in the domain, or idempotency-key race loss).
    /// Returns [`AppError::Internal`] on other database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code within a domain.
    async fn find_by_code(&self, code: &str, domain_id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by the idempotency key.
    async fn find_by_hash_owner_domain(
        &self,
        content_hash: &str,
        owner_id: i64,
        domain_id: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Finds links matching a code across all domains, capped at `limit`.
    ///
    /// Compatibility path for data predating multi-domain support; callers
    /// accept a result only when exactly one row matches.
    async fn find_by_code_any_domain(
        &self,
        code: &str,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// True when `code` already exists in the domain.
    async fn code_exists_in_domain(&self, code: &str, domain_id: i64) -> Result<bool, AppError>;

    /// Number of existing codes with exactly this length.
    ///
    /// Drives code-length escalation against the 62^length address space.
    async fn count_by_code_length(&self, length: i32) -> Result<i64, AppError>;

    /// Lists an owner's links, newest first. `page` is 1-indexed.
    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Total number of links for an owner.
    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError>;

    /// Deletes an owner's link by code, returning the removed row so the
    /// caller can clean up cache and search-index entries.
    ///
    /// Returns `Ok(None)` when no such link exists.
    async fn delete_by_owner(&self, owner_id: i64, code: &str) -> Result<Option<Link>, AppError>;

    /// Adds `by` clicks to a link's aggregate counter.
    ///
    /// The stats pipeline calls this once per link per flush with the
    /// batch-aggregated count.
    async fn increment_clicks(&self, link_id: i64, by: i64) -> Result<(), AppError>;
}
