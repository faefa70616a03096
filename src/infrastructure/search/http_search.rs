//! Meilisearch-compatible REST search index client.

use super::client::{SearchError, SearchIndexClient, SearchResult};
use crate::domain::search_task::LinkDocument;
use async_trait::async_trait;
use tracing::{debug, info};

const INDEX_NAME: &str = "links";

/// Search index client speaking the Meilisearch document API over HTTP.
///
/// The underlying HTTP client is blocking, so every call runs on the
/// blocking thread pool. That is acceptable here: the only caller is the
/// single search-pipeline consumer, never the request path.
pub struct HttpSearchIndex {
    base_url: String,
    api_key: Option<String>,
}

impl HttpSearchIndex {
    /// Creates a client and verifies the backend responds.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Unavailable`] when the health endpoint does
    /// not answer.
    pub async fn connect(base_url: &str, api_key: Option<&str>) -> SearchResult<Self> {
        let client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|s| s.to_string()),
        };

        if !client.health_check().await {
            return Err(SearchError::Unavailable(format!(
                "health check failed for {base_url}"
            )));
        }

        info!("Connected to search index at {}", base_url);
        Ok(client)
    }

    fn documents_url(&self) -> String {
        format!("{}/indexes/{}/documents", self.base_url, INDEX_NAME)
    }

    fn authorize(&self, req: ureq::RequestBuilder<ureq::typestate::WithBody>) -> ureq::RequestBuilder<ureq::typestate::WithBody> {
        match &self.api_key {
            Some(key) => req.header("Authorization", &format!("Bearer {key}")),
            None => req,
        }
    }

    fn authorize_get(
        &self,
        req: ureq::RequestBuilder<ureq::typestate::WithoutBody>,
    ) -> ureq::RequestBuilder<ureq::typestate::WithoutBody> {
        match &self.api_key {
            Some(key) => req.header("Authorization", &format!("Bearer {key}")),
            None => req,
        }
    }
}

#[async_trait]
impl SearchIndexClient for HttpSearchIndex {
    async fn upsert(&self, doc: LinkDocument) -> SearchResult<()> {
        let url = self.documents_url();
        let req = self.authorize(ureq::post(&url));
        let link_id = doc.id;

        tokio::task::spawn_blocking(move || {
            // Meilisearch upserts documents posted as an array.
            req.send_json(&[doc])
                .map(|_| ())
                .map_err(|e| SearchError::Request(e.to_string()))
        })
        .await
        .map_err(|e| SearchError::Request(format!("blocking task failed: {e}")))??;

        debug!("Search index upsert: link_id={}", link_id);
        Ok(())
    }

    async fn delete(&self, link_id: i64) -> SearchResult<()> {
        let url = format!("{}/{}", self.documents_url(), link_id);
        let req = self.authorize_get(ureq::delete(&url));

        tokio::task::spawn_blocking(move || {
            req.call()
                .map(|_| ())
                .map_err(|e| SearchError::Request(e.to_string()))
        })
        .await
        .map_err(|e| SearchError::Request(format!("blocking task failed: {e}")))??;

        debug!("Search index delete: link_id={}", link_id);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        let req = self.authorize_get(ureq::get(&url));

        tokio::task::spawn_blocking(move || req.call().is_ok())
            .await
            .unwrap_or(false)
    }
}
