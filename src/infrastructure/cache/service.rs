//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// TTL key-value cache shadowing durable link lookups on the hot path.
///
/// Implementations must be fail-open: the redirect path treats any cache
/// error as a miss and continues against durable storage, so production
/// implementations log errors instead of propagating them.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - no-op for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached value.
    ///
    /// Returns `Ok(None)` on a miss; production implementations also
    /// return `Ok(None)` on backend errors (fail-open).
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value with a TTL in seconds (implementation default when
    /// `None`).
    ///
    /// Must only be called after a confirmed durable read or write.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached entry. Best-effort.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// True when the cache backend responds.
    async fn health_check(&self) -> bool;
}
