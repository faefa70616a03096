//! No-op search index for deployments without a search backend.

use super::client::{SearchIndexClient, SearchResult};
use crate::domain::search_task::LinkDocument;
use async_trait::async_trait;
use tracing::debug;

/// A search index client that discards every mutation.
pub struct NullSearchIndex;

impl NullSearchIndex {
    pub fn new() -> Self {
        debug!("Using NullSearchIndex (search indexing disabled)");
        Self
    }
}

impl Default for NullSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchIndexClient for NullSearchIndex {
    async fn upsert(&self, _doc: LinkDocument) -> SearchResult<()> {
        Ok(())
    }

    async fn delete(&self, _link_id: i64) -> SearchResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
