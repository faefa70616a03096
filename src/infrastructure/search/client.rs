//! Search index client trait and error type.

use crate::domain::search_task::LinkDocument;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend unreachable: {0}")]
    Unavailable(String),
    #[error("Search request failed: {0}")]
    Request(String),
}

/// Result type for search index operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Client for the external search index.
///
/// Index consistency is best-effort: callers submit mutations through the
/// search pipeline and never block on this client directly.
///
/// # Implementations
///
/// - [`crate::infrastructure::search::HttpSearchIndex`] -
///   Meilisearch-compatible REST backend
/// - [`crate::infrastructure::search::NullSearchIndex`] - no-op when no
///   backend is configured
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    /// Creates or replaces the document keyed by `doc.id`.
    async fn upsert(&self, doc: LinkDocument) -> SearchResult<()>;

    /// Deletes the document keyed by `link_id`. Deleting a missing
    /// document is not an error.
    async fn delete(&self, link_id: i64) -> SearchResult<()>;

    /// True when the backend responds.
    async fn health_check(&self) -> bool;
}
