//! Search index mutation tasks for asynchronous indexing.

use crate::domain::entities::Link;
use serde::Serialize;

/// Document shape stored in the search index, keyed by the link id.
#[derive(Debug, Clone, Serialize)]
pub struct LinkDocument {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub owner_id: i64,
    pub domain_id: i64,
    pub created_at: i64,
}

impl From<&Link> for LinkDocument {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id,
            code: link.code.clone(),
            original_url: link.original_url.clone(),
            title: link.title.clone(),
            owner_id: link.owner_id,
            domain_id: link.domain_id,
            created_at: link.created_at.timestamp(),
        }
    }
}

/// A search index mutation, consumed exactly once by the search pipeline.
#[derive(Debug, Clone)]
pub enum SearchTask {
    /// Upsert the link document into the index.
    Index(LinkDocument),
    /// Remove the document with this link id from the index.
    Delete(i64),
}

impl SearchTask {
    /// The link id this task refers to, for logging.
    pub fn link_id(&self) -> i64 {
        match self {
            SearchTask::Index(doc) => doc.id,
            SearchTask::Delete(id) => *id,
        }
    }

    /// Short action name for logging.
    pub fn action(&self) -> &'static str {
        match self {
            SearchTask::Index(_) => "index",
            SearchTask::Delete(_) => "delete",
        }
    }
}
