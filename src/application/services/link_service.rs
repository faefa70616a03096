//! Link lifecycle: idempotent creation, listing, and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::domain_resolver::DomainResolver;
use crate::application::services::redirect_service::{CachedTarget, redirect_cache_key};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, SettingsRepository};
use crate::domain::search_task::{LinkDocument, SearchTask};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::pipeline::SearchHandle;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::content_hash::content_hash;
use crate::utils::url_normalizer::normalize_url;

/// Total random-code attempts before giving up with
/// [`AppError::Exhausted`].
const MAX_CODE_ATTEMPTS: u32 = 50;

/// Collisions tolerated at one length before escalating to the next.
const ATTEMPTS_PER_LENGTH: u32 = 10;

/// Occupancy fraction of `62^length` at which generation starts one
/// length higher.
const UTILIZATION_THRESHOLD: f64 = 0.9;

/// Listing page-size bounds.
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// A shorten request after HTTP-layer deserialization.
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub url: String,
    pub custom_code: Option<String>,
    pub title: Option<String>,
    pub domain_id: Option<i64>,
}

/// A link paired with its resolved public short URL.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub link: Link,
    pub short_url: String,
}

/// Outcome of a create call; `created` is `false` when an existing link
/// was returned idempotently.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_url: String,
    pub created: bool,
}

/// One page of an owner's links.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub items: Vec<ShortLink>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Creates, lists, and deletes short links.
///
/// Creation is idempotent per `(owner, domain, content hash of the
/// normalized URL)` and relies on the store's unique constraints as the
/// only cross-instance coordination: collisions are detected after the
/// fact and retried, never prevented with locks.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    settings: Arc<dyn SettingsRepository>,
    resolver: Arc<DomainResolver>,
    cache: Arc<dyn CacheService>,
    search: SearchHandle,
    min_code_length: i32,
    max_code_length: i32,
    cache_ttl_seconds: u64,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        settings: Arc<dyn SettingsRepository>,
        resolver: Arc<DomainResolver>,
        cache: Arc<dyn CacheService>,
        search: SearchHandle,
        min_code_length: i32,
        max_code_length: i32,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            links,
            settings,
            resolver,
            cache,
            search,
            min_code_length,
            max_code_length,
            cache_ttl_seconds,
        }
    }

    /// Creates a short link, or returns the existing one for an identical
    /// submission.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - bad URL or bad custom code
    /// - [`AppError::Conflict`] - custom code taken by a different URL
    /// - [`AppError::Exhausted`] - random generation hit the attempt cap
    pub async fn create_link(
        &self,
        owner_id: i64,
        req: CreateLinkRequest,
    ) -> Result<CreatedLink, AppError> {
        let normalized_url =
            normalize_url(&req.url).map_err(|reason| AppError::bad_request(reason, json!({})))?;
        let hash = content_hash(&normalized_url);

        let domain = self.resolver.domain_for_owner(owner_id, req.domain_id).await?;
        let domain_id = domain.as_ref().map(|d| d.id).unwrap_or(0);
        let prefix = self.resolver.url_prefix(domain.as_ref());

        // Idempotency fast path: an identical submission returns the
        // existing link without touching code generation.
        if let Some(existing) = self
            .links
            .find_by_hash_owner_domain(&hash, owner_id, domain_id)
            .await?
        {
            debug!("Idempotent hit for existing link {}", existing.code);
            metrics::counter!("links_create_idempotent_total").increment(1);
            return Ok(self.created(existing, &prefix, false));
        }

        let link = match &req.custom_code {
            Some(code) => {
                validate_custom_code(code)?;
                self.create_with_custom_code(owner_id, domain_id, code, &normalized_url, &req, &hash)
                    .await?
            }
            None => {
                self.create_with_generated_code(owner_id, domain_id, &normalized_url, &req, &hash)
                    .await?
            }
        };

        match link {
            CreateResult::Created(link) => {
                info!("Created link {} -> {}", link.code, link.original_url);
                metrics::counter!("links_created_total").increment(1);
                self.warm_cache(&link).await;
                self.search.publish(SearchTask::Index(LinkDocument::from(&link)));
                Ok(self.created(link, &prefix, true))
            }
            CreateResult::Existing(link) => {
                metrics::counter!("links_create_idempotent_total").increment(1);
                Ok(self.created(link, &prefix, false))
            }
        }
    }

    async fn create_with_custom_code(
        &self,
        owner_id: i64,
        domain_id: i64,
        code: &str,
        normalized_url: &str,
        req: &CreateLinkRequest,
        hash: &str,
    ) -> Result<CreateResult, AppError> {
        // Advisory existence pre-check; the unique constraint below still
        // decides races.
        if self.links.code_exists_in_domain(code, domain_id).await? {
            if let Some(existing) = self
                .links
                .find_by_hash_owner_domain(hash, owner_id, domain_id)
                .await?
            {
                return Ok(CreateResult::Existing(existing));
            }
            return Err(AppError::conflict(
                "Custom code is already taken",
                json!({ "code": code }),
            ));
        }

        let new_link = NewLink {
            owner_id,
            domain_id,
            code: code.to_string(),
            original_url: normalized_url.to_string(),
            title: req.title.clone(),
            content_hash: hash.to_string(),
        };

        match self.links.create(new_link).await {
            Ok(link) => Ok(CreateResult::Created(link)),
            Err(AppError::Conflict { .. }) => {
                // Either the code is taken or a concurrent identical
                // submission won the race. Only the latter converges.
                if let Some(existing) = self
                    .links
                    .find_by_hash_owner_domain(hash, owner_id, domain_id)
                    .await?
                {
                    return Ok(CreateResult::Existing(existing));
                }
                Err(AppError::conflict(
                    "Custom code is already taken",
                    json!({ "code": code }),
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn create_with_generated_code(
        &self,
        owner_id: i64,
        domain_id: i64,
        normalized_url: &str,
        req: &CreateLinkRequest,
        hash: &str,
    ) -> Result<CreateResult, AppError> {
        let (start_length, max_length) = self.select_code_length().await;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            // Every ATTEMPTS_PER_LENGTH collisions the code grows by one
            // symbol, multiplying the address space by 62.
            let length = (start_length + ((attempt - 1) / ATTEMPTS_PER_LENGTH) as i32)
                .min(max_length);
            let code = generate_code(length as usize);

            let new_link = NewLink {
                owner_id,
                domain_id,
                code: code.clone(),
                original_url: normalized_url.to_string(),
                title: req.title.clone(),
                content_hash: hash.to_string(),
            };

            match self.links.create(new_link).await {
                Ok(link) => return Ok(CreateResult::Created(link)),
                Err(AppError::Conflict { .. }) => {
                    if let Some(existing) = self
                        .links
                        .find_by_hash_owner_domain(hash, owner_id, domain_id)
                        .await?
                    {
                        return Ok(CreateResult::Existing(existing));
                    }
                    metrics::counter!("links_code_collisions_total").increment(1);
                    debug!(
                        "Code collision on '{}' (attempt {}/{})",
                        code, attempt, MAX_CODE_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        metrics::counter!("links_code_exhausted_total").increment(1);
        Err(AppError::exhausted(
            "Could not allocate a unique code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Picks the starting code length.
    ///
    /// Settings-table overrides take precedence over static configuration;
    /// a failing settings read falls back silently to configuration. The
    /// start escalates past lengths whose address space is already at
    /// [`UTILIZATION_THRESHOLD`] occupancy.
    async fn select_code_length(&self) -> (i32, i32) {
        let min = match self.settings.min_code_length().await {
            Ok(Some(v)) if v >= 1 && v <= 32 => v,
            Ok(_) => self.min_code_length,
            Err(e) => {
                warn!("Settings read failed, using configured min length: {}", e);
                self.min_code_length
            }
        };
        let max = match self.settings.max_code_length().await {
            Ok(Some(v)) if v >= min && v <= 32 => v,
            Ok(_) => self.max_code_length.max(min),
            Err(e) => {
                warn!("Settings read failed, using configured max length: {}", e);
                self.max_code_length.max(min)
            }
        };

        let mut length = min;
        while length < max {
            let used = match self.links.count_by_code_length(length).await {
                Ok(n) => n,
                Err(e) => {
                    warn!("Utilization check failed at length {}: {}", length, e);
                    break;
                }
            };
            let capacity = 62f64.powi(length);
            if (used as f64) < capacity * UTILIZATION_THRESHOLD {
                break;
            }
            debug!(
                "Length {} is at {:.0}% occupancy, escalating",
                length,
                used as f64 / capacity * 100.0
            );
            length += 1;
        }

        (length, max)
    }

    /// Lists an owner's links, newest first.
    pub async fn list_links(
        &self,
        owner_id: i64,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<LinkPage, AppError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let links = self.links.list_by_owner(owner_id, page, limit).await?;
        let total = self.links.count_by_owner(owner_id).await?;

        let mut items = Vec::with_capacity(links.len());
        for link in links {
            let short_url = self.short_url_for(&link).await?;
            items.push(ShortLink { link, short_url });
        }

        Ok(LinkPage {
            items,
            total,
            page,
            limit,
        })
    }

    /// Deletes an owner's link and cleans up its cache and search-index
    /// footprint.
    pub async fn delete_link(&self, owner_id: i64, code: &str) -> Result<(), AppError> {
        let link = self
            .links
            .delete_by_owner(owner_id, code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        if let Err(e) = self
            .cache
            .invalidate(&redirect_cache_key(link.domain_id, &link.code))
            .await
        {
            warn!("Cache invalidation failed for {}: {}", link.code, e);
        }
        self.search.publish(SearchTask::Delete(link.id));

        info!("Deleted link {}", link.code);
        metrics::counter!("links_deleted_total").increment(1);
        Ok(())
    }

    /// Pre-warms the redirect cache so the first hit on a fresh link skips
    /// durable storage. Best-effort; the redirect path repopulates on a
    /// miss.
    async fn warm_cache(&self, link: &Link) {
        let _ = self
            .cache
            .set(
                &redirect_cache_key(link.domain_id, &link.code),
                &CachedTarget::encode(link.id, &link.original_url),
                Some(self.cache_ttl_seconds),
            )
            .await;
    }

    /// Public short URL for a link, honoring its domain when it has one.
    pub async fn short_url_for(&self, link: &Link) -> Result<String, AppError> {
        let domain = if link.domain_id == 0 {
            None
        } else {
            self.resolver.domain_for_owner(link.owner_id, Some(link.domain_id))
                .await
                .ok()
                .flatten()
        };
        Ok(format!(
            "{}/{}",
            self.resolver.url_prefix(domain.as_ref()),
            link.code
        ))
    }

    fn created(&self, link: Link, prefix: &str, created: bool) -> CreatedLink {
        let short_url = format!("{}/{}", prefix, link.code);
        CreatedLink {
            link,
            short_url,
            created,
        }
    }
}

enum CreateResult {
    Created(Link),
    Existing(Link),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        MockDomainRepository, MockLinkRepository, MockSettingsRepository,
    };
    use crate::infrastructure::cache::MockCacheService;
    use chrono::Utc;
    use tokio::sync::mpsc;

    fn link(id: i64, code: &str, url: &str, hash: &str) -> Link {
        let now = Utc::now();
        Link {
            id,
            owner_id: 0,
            domain_id: 0,
            code: code.to_string(),
            original_url: url.to_string(),
            title: None,
            content_hash: hash.to_string(),
            click_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    struct Fixture {
        links: MockLinkRepository,
        settings: MockSettingsRepository,
        domains: MockDomainRepository,
        cache: MockCacheService,
    }

    impl Fixture {
        fn new() -> Self {
            let mut settings = MockSettingsRepository::new();
            settings.expect_min_code_length().returning(|| Ok(None));
            settings.expect_max_code_length().returning(|| Ok(None));

            let mut domains = MockDomainRepository::new();
            domains.expect_get_default().returning(|_| Ok(None));

            // The cache warm after an insert is best-effort background
            // noise for most tests.
            let mut cache = MockCacheService::new();
            cache.expect_set().returning(|_, _, _| Ok(()));

            Self {
                links: MockLinkRepository::new(),
                settings,
                domains,
                cache,
            }
        }

        fn service(self) -> (LinkService, mpsc::Receiver<SearchTask>) {
            let (tx, rx) = mpsc::channel(16);
            let resolver = Arc::new(DomainResolver::new(
                Arc::new(self.domains),
                "https://s.example.com",
            ));
            let service = LinkService::new(
                Arc::new(self.links),
                Arc::new(self.settings),
                resolver,
                Arc::new(self.cache),
                SearchHandle::new(tx),
                6,
                10,
                3600,
            );
            (service, rx)
        }
    }

    fn request(url: &str) -> CreateLinkRequest {
        CreateLinkRequest {
            url: url.to_string(),
            custom_code: None,
            title: None,
            domain_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_generates_six_char_code() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_count_by_code_length()
            .returning(|_| Ok(0));
        fx.links.expect_create().returning(|nl| {
            assert_eq!(nl.code.len(), 6);
            Ok(link(1, &nl.code, &nl.original_url, &nl.content_hash))
        });

        let (service, mut rx) = fx.service();
        let created = service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();

        assert!(created.created);
        assert_eq!(created.link.code.len(), 6);
        assert_eq!(
            created.short_url,
            format!("https://s.example.com/{}", created.link.code)
        );
        assert!(matches!(rx.try_recv().unwrap(), SearchTask::Index(_)));
    }

    #[tokio::test]
    async fn test_create_is_idempotent_for_same_url() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|hash, _, _| Ok(Some(link(9, "exists", "https://example.com/page", hash))));
        fx.links.expect_create().never();

        let (service, mut rx) = fx.service();
        let created = service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();

        assert!(!created.created);
        assert_eq!(created.link.code, "exists");
        assert!(rx.try_recv().is_err(), "no index task for idempotent hit");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let fx = Fixture::new();
        let (service, _rx) = fx.service();

        let err = service
            .create_link(0, request("ftp://example.com/file"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_collision_retries_until_success() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_count_by_code_length()
            .returning(|_| Ok(0));

        let mut calls = 0;
        fx.links.expect_create().returning(move |nl| {
            calls += 1;
            if calls < 3 {
                Err(AppError::conflict("taken", json!({})))
            } else {
                Ok(link(1, &nl.code, &nl.original_url, &nl.content_hash))
            }
        });

        let (service, _rx) = fx.service();
        let created = service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();
        assert!(created.created);
    }

    #[tokio::test]
    async fn test_collision_converges_on_concurrent_identical_submission() {
        let mut fx = Fixture::new();

        let mut hash_lookups = 0;
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(move |hash, _, _| {
                hash_lookups += 1;
                if hash_lookups == 1 {
                    // Pre-check misses; the other writer has not landed yet.
                    Ok(None)
                } else {
                    Ok(Some(link(4, "race42", "https://example.com/page", hash)))
                }
            });
        fx.links
            .expect_count_by_code_length()
            .returning(|_| Ok(0));
        fx.links
            .expect_create()
            .returning(|_| Err(AppError::conflict("idempotency key taken", json!({}))));

        let (service, _rx) = fx.service();
        let created = service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();

        assert!(!created.created);
        assert_eq!(created.link.code, "race42");
    }

    #[tokio::test]
    async fn test_exhausted_after_attempt_cap() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_count_by_code_length()
            .returning(|_| Ok(0));
        fx.links
            .expect_create()
            .times(50)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));

        let (service, _rx) = fx.service();
        let err = service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn test_code_length_escalates_with_collisions() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_count_by_code_length()
            .returning(|_| Ok(0));

        let mut lengths = Vec::new();
        let mut calls = 0;
        fx.links.expect_create().returning(move |nl| {
            calls += 1;
            lengths.push(nl.code.len());
            if calls <= 10 {
                assert_eq!(nl.code.len(), 6, "first ten attempts stay at the start");
                Err(AppError::conflict("taken", json!({})))
            } else {
                assert_eq!(nl.code.len(), 7, "attempt 11 grows by one symbol");
                Ok(link(1, &nl.code, &nl.original_url, &nl.content_hash))
            }
        });

        let (service, _rx) = fx.service();
        service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_high_utilization_starts_longer() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        // Length 6 is past 90% of 62^6; length 7 is empty.
        fx.links.expect_count_by_code_length().returning(|length| {
            if length == 6 {
                Ok((62f64.powi(6) * 0.95) as i64)
            } else {
                Ok(0)
            }
        });
        fx.links.expect_create().returning(|nl| {
            assert_eq!(nl.code.len(), 7);
            Ok(link(1, &nl.code, &nl.original_url, &nl.content_hash))
        });

        let (service, _rx) = fx.service();
        service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_settings_override_code_length() {
        let mut fx = Fixture::new();
        fx.settings = MockSettingsRepository::new();
        fx.settings
            .expect_min_code_length()
            .returning(|| Ok(Some(8)));
        fx.settings
            .expect_max_code_length()
            .returning(|| Ok(Some(12)));

        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_count_by_code_length()
            .returning(|_| Ok(0));
        fx.links.expect_create().returning(|nl| {
            assert_eq!(nl.code.len(), 8);
            Ok(link(1, &nl.code, &nl.original_url, &nl.content_hash))
        });

        let (service, _rx) = fx.service();
        service
            .create_link(0, request("https://example.com/page"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_custom_code_precheck_conflicts_without_insert() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_code_exists_in_domain()
            .withf(|code, domain_id| code == "promo2025" && *domain_id == 0)
            .returning(|_, _| Ok(true));
        fx.links.expect_create().never();

        let (service, _rx) = fx.service();
        let err = service
            .create_link(
                0,
                CreateLinkRequest {
                    url: "https://example.com/page".to_string(),
                    custom_code: Some("promo2025".to_string()),
                    title: None,
                    domain_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_warms_redirect_cache() {
        let mut fx = Fixture::new();
        fx.cache = MockCacheService::new();
        fx.cache
            .expect_set()
            .withf(|key, value, ttl| {
                key == "redir:0:warm42"
                    && value == "1|https://example.com/page"
                    && *ttl == Some(3600)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_code_exists_in_domain()
            .returning(|_, _| Ok(false));
        fx.links.expect_create().returning(|nl| {
            Ok(link(1, &nl.code, &nl.original_url, &nl.content_hash))
        });

        let (service, _rx) = fx.service();
        let created = service
            .create_link(
                0,
                CreateLinkRequest {
                    url: "https://example.com/page".to_string(),
                    custom_code: Some("warm42".to_string()),
                    title: None,
                    domain_id: None,
                },
            )
            .await
            .unwrap();
        assert!(created.created);
    }

    #[tokio::test]
    async fn test_custom_code_conflict_with_different_url() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        fx.links
            .expect_code_exists_in_domain()
            .returning(|_, _| Ok(false));
        fx.links
            .expect_create()
            .returning(|_| Err(AppError::conflict("taken", json!({}))));

        let (service, _rx) = fx.service();
        let err = service
            .create_link(
                0,
                CreateLinkRequest {
                    url: "https://example.com/page".to_string(),
                    custom_code: Some("promo2025".to_string()),
                    title: None,
                    domain_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_custom_code_rejects_reserved() {
        let mut fx = Fixture::new();
        fx.links
            .expect_find_by_hash_owner_domain()
            .returning(|_, _, _| Ok(None));
        let (service, _rx) = fx.service();

        let err = service
            .create_link(
                0,
                CreateLinkRequest {
                    url: "https://example.com/page".to_string(),
                    custom_code: Some("health".to_string()),
                    title: None,
                    domain_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache_and_search() {
        let mut fx = Fixture::new();
        fx.links
            .expect_delete_by_owner()
            .returning(|_, code| Ok(Some(link(3, code, "https://example.com/", "h"))));
        fx.cache
            .expect_invalidate()
            .withf(|key| key == "redir:0:gone42")
            .times(1)
            .returning(|_| Ok(()));

        let (service, mut rx) = fx.service();
        service.delete_link(0, "gone42").await.unwrap();

        match rx.try_recv().unwrap() {
            SearchTask::Delete(id) => assert_eq!(id, 3),
            other => panic!("expected delete task, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut fx = Fixture::new();
        fx.links
            .expect_delete_by_owner()
            .returning(|_, _| Ok(None));

        let (service, _rx) = fx.service();
        let err = service.delete_link(0, "nothere").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_clamps_pagination() {
        let mut fx = Fixture::new();
        fx.links
            .expect_list_by_owner()
            .withf(|_, page, limit| *page == 1 && *limit == 100)
            .returning(|_, _, _| Ok(vec![]));
        fx.links.expect_count_by_owner().returning(|_| Ok(0));

        let (service, _rx) = fx.service();
        let page = service.list_links(0, Some(-3), Some(5000)).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 100);
        assert_eq!(page.total, 0);
    }
}
