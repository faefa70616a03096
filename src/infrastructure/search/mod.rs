//! Search index integration.
//!
//! Provides a [`SearchIndexClient`] trait with two implementations:
//! - [`HttpSearchIndex`] - Meilisearch-compatible REST backend
//! - [`NullSearchIndex`] - no-op when search is not configured

mod client;
mod http_search;
mod null_search;

pub use client::{SearchError, SearchIndexClient, SearchResult};
pub use http_search::HttpSearchIndex;
pub use null_search::NullSearchIndex;

#[cfg(test)]
pub use client::MockSearchIndexClient;
