//! Redirect resolution: the latency-critical read path.
//!
//! A warm resolution touches only the cache; durable storage is read on
//! misses and its result written back with a TTL. Click tracking is
//! published to the stats pipeline and never awaited.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::application::services::domain_resolver::DomainResolver;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::pipeline::StatsHandle;

/// Upper bound on cross-domain matches fetched by the fallback lookup.
/// Two is enough to distinguish "exactly one" from "ambiguous".
const FALLBACK_MATCH_LIMIT: i64 = 2;

/// Cache key for a resolved redirect target.
pub fn redirect_cache_key(domain_id: i64, code: &str) -> String {
    format!("redir:{domain_id}:{code}")
}

/// The cached payload of a resolved redirect: link id and destination.
///
/// Encoded as `{link_id}|{url}`; the URL may itself contain `|` so
/// decoding splits on the first separator only.
#[derive(Debug, PartialEq, Eq)]
pub struct CachedTarget {
    pub link_id: i64,
    pub url: String,
}

impl CachedTarget {
    pub fn encode(link_id: i64, url: &str) -> String {
        format!("{link_id}|{url}")
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let (id, url) = raw.split_once('|')?;
        let link_id = id.parse().ok()?;
        if url.is_empty() {
            return None;
        }
        Some(Self {
            link_id,
            url: url.to_string(),
        })
    }
}

/// Per-request click metadata forwarded to the stats pipeline.
#[derive(Debug, Clone, Default)]
pub struct ClickMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Resolves `(host, code)` to a destination URL.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    resolver: Arc<DomainResolver>,
    cache: Arc<dyn CacheService>,
    stats: StatsHandle,
    cache_ttl_seconds: u64,
    any_domain_fallback: bool,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        resolver: Arc<DomainResolver>,
        cache: Arc<dyn CacheService>,
        stats: StatsHandle,
        cache_ttl_seconds: u64,
        any_domain_fallback: bool,
    ) -> Self {
        Self {
            links,
            resolver,
            cache,
            stats,
            cache_ttl_seconds,
            any_domain_fallback,
        }
    }

    /// Resolves a short code for the given request host and records the
    /// click.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown code, or a host that yields no
    ///   domain context while the fallback is disabled
    pub async fn resolve(
        &self,
        host: &str,
        code: &str,
        meta: ClickMeta,
    ) -> Result<String, AppError> {
        // Domain resolution is best-effort on this path: an unknown or
        // misconfigured host means "no domain context", never a distinct
        // error to the caller.
        let domain_id = match self.resolver.resolve_request_host(host).await {
            Ok(id) => Some(id),
            Err(e) => {
                debug!("No domain context for host '{}': {}", host, e);
                if !self.any_domain_fallback {
                    return Err(not_found(code));
                }
                None
            }
        };

        if let Some(domain_id) = domain_id {
            let key = redirect_cache_key(domain_id, code);

            if let Ok(Some(raw)) = self.cache.get(&key).await {
                match CachedTarget::decode(&raw) {
                    Some(target) => {
                        metrics::counter!("redirect_cache_hits_total").increment(1);
                        self.record_click(target.link_id, meta);
                        return Ok(target.url);
                    }
                    None => {
                        // Corrupt entry; drop it and fall through to storage.
                        debug!("Dropping undecodable cache entry for key {}", key);
                        let _ = self.cache.invalidate(&key).await;
                    }
                }
            }
            metrics::counter!("redirect_cache_misses_total").increment(1);

            if let Some(link) = self.links.find_by_code(code, domain_id).await? {
                self.populate_cache(&key, &link).await;
                self.record_click(link.id, meta);
                return Ok(link.original_url);
            }

            if !self.any_domain_fallback {
                return Err(not_found(code));
            }
        }

        self.resolve_any_domain(code, meta).await
    }

    /// Cross-domain fallback for data predating multi-domain support.
    ///
    /// Accepts a match only when it is unique: with two or more rows the
    /// intended target is unknowable, so the lookup fails closed.
    async fn resolve_any_domain(&self, code: &str, meta: ClickMeta) -> Result<String, AppError> {
        let matches = self
            .links
            .find_by_code_any_domain(code, FALLBACK_MATCH_LIMIT)
            .await?;

        match matches.as_slice() {
            [link] => {
                metrics::counter!("redirect_fallback_hits_total").increment(1);
                let key = redirect_cache_key(link.domain_id, code);
                self.populate_cache(&key, link).await;
                self.record_click(link.id, meta);
                Ok(link.original_url.clone())
            }
            [] => Err(not_found(code)),
            _ => {
                debug!("Fallback for code '{}' is ambiguous", code);
                Err(not_found(code))
            }
        }
    }

    async fn populate_cache(&self, key: &str, link: &Link) {
        // Best-effort; a cache failure must not fail the redirect.
        let _ = self
            .cache
            .set(
                key,
                &CachedTarget::encode(link.id, &link.original_url),
                Some(self.cache_ttl_seconds),
            )
            .await;
    }

    fn record_click(&self, link_id: i64, meta: ClickMeta) {
        self.stats.publish(ClickEvent::new(
            link_id,
            meta.ip,
            meta.user_agent.as_deref(),
            meta.referer.as_deref(),
        ));
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
