//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService};
use crate::domain::repositories::DomainRepository;
use crate::infrastructure::cache::CacheService;
use crate::pipeline::{SearchHandle, StatsHandle};

/// Application state shared across all request handlers.
///
/// Cloning is cheap: every field is an `Arc` or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub domain_repository: Arc<dyn DomainRepository>,
    pub cache: Arc<dyn CacheService>,
    pub stats: StatsHandle,
    pub search: SearchHandle,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        redirect_service: Arc<RedirectService>,
        domain_repository: Arc<dyn DomainRepository>,
        cache: Arc<dyn CacheService>,
        stats: StatsHandle,
        search: SearchHandle,
    ) -> Self {
        Self {
            link_service,
            redirect_service,
            domain_repository,
            cache,
            stats,
            search,
        }
    }
}
