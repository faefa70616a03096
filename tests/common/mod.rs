//! Shared in-memory test doubles implementing the repository traits.
//!
//! The fakes enforce the same unique constraints as the real schema so
//! collision and idempotency behavior can be exercised end to end without
//! a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use shortlink::domain::entities::{Domain, Link, NewClick, NewLink};
use shortlink::domain::repositories::{
    AccessLogRepository, DomainRepository, LinkRepository, SettingsRepository,
};
use shortlink::domain::search_task::LinkDocument;
use shortlink::error::AppError;
use shortlink::infrastructure::cache::{CacheResult, CacheService};
use shortlink::infrastructure::search::{SearchError, SearchIndexClient, SearchResult};

/// Link store backed by a `Vec`, enforcing the two unique constraints.
#[derive(Default)]
pub struct MemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
    pub increments: Mutex<Vec<(i64, i64)>>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            increments: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, link: Link) {
        self.links.lock().unwrap().push(link);
    }

    pub fn remove_all(&self) {
        self.links.lock().unwrap().clear();
    }

    pub fn all(&self) -> Vec<Link> {
        self.links.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();

        if links
            .iter()
            .any(|l| l.domain_id == new_link.domain_id && l.code == new_link.code)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "uq_links_domain_code" }),
            ));
        }
        if links.iter().any(|l| {
            l.owner_id == new_link.owner_id
                && l.domain_id == new_link.domain_id
                && l.content_hash == new_link.content_hash
        }) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "uq_links_idempotency" }),
            ));
        }

        let now = Utc::now();
        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            owner_id: new_link.owner_id,
            domain_id: new_link.domain_id,
            code: new_link.code,
            original_url: new_link.original_url,
            title: new_link.title,
            content_hash: new_link.content_hash,
            click_count: 0,
            created_at: now,
            updated_at: now,
        };
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str, domain_id: i64) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code && l.domain_id == domain_id)
            .cloned())
    }

    async fn find_by_hash_owner_domain(
        &self,
        content_hash: &str,
        owner_id: i64,
        domain_id: i64,
    ) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| {
                l.content_hash == content_hash
                    && l.owner_id == owner_id
                    && l.domain_id == domain_id
            })
            .cloned())
    }

    async fn find_by_code_any_domain(
        &self,
        code: &str,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.code == code)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn code_exists_in_domain(&self, code: &str, domain_id: i64) -> Result<bool, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.code == code && l.domain_id == domain_id))
    }

    async fn count_by_code_length(&self, length: i32) -> Result<i64, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.code.len() as i32 == length)
            .count() as i64)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = ((page - 1) * limit) as usize;
        Ok(links.into_iter().skip(offset).take(limit as usize).collect())
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .count() as i64)
    }

    async fn delete_by_owner(&self, owner_id: i64, code: &str) -> Result<Option<Link>, AppError> {
        let mut links = self.links.lock().unwrap();
        let position = links
            .iter()
            .position(|l| l.owner_id == owner_id && l.code == code);
        Ok(position.map(|i| links.remove(i)))
    }

    async fn increment_clicks(&self, link_id: i64, by: i64) -> Result<(), AppError> {
        self.increments.lock().unwrap().push((link_id, by));
        let mut links = self.links.lock().unwrap();
        if let Some(link) = links.iter_mut().find(|l| l.id == link_id) {
            link.click_count += by;
        }
        Ok(())
    }
}

/// Domain store backed by a fixed list.
#[derive(Default)]
pub struct MemoryDomainRepository {
    domains: Mutex<Vec<Domain>>,
}

impl MemoryDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domains(domains: Vec<Domain>) -> Self {
        Self {
            domains: Mutex::new(domains),
        }
    }

    pub fn insert(&self, domain: Domain) {
        self.domains.lock().unwrap().push(domain);
    }
}

pub fn make_domain(id: i64, owner_id: i64, hostname: &str, is_default: bool) -> Domain {
    let now = Utc::now();
    Domain {
        id,
        owner_id,
        hostname: hostname.to_string(),
        is_default,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl DomainRepository for MemoryDomainRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Domain>, AppError> {
        Ok(self
            .domains
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn get_default(&self, owner_id: i64) -> Result<Option<Domain>, AppError> {
        Ok(self
            .domains
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.owner_id == owner_id && d.is_default && d.is_active)
            .cloned())
    }

    async fn find_active_by_name(&self, name: &str) -> Result<Vec<Domain>, AppError> {
        Ok(self
            .domains
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_active && d.hostname.eq_ignore_ascii_case(name))
            .cloned()
            .collect())
    }
}

/// Click audit sink recording rows in memory.
#[derive(Default)]
pub struct MemoryAccessLogRepository {
    pub clicks: Mutex<Vec<NewClick>>,
}

impl MemoryAccessLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.clicks.lock().unwrap().len()
    }
}

#[async_trait]
impl AccessLogRepository for MemoryAccessLogRepository {
    async fn create(&self, click: NewClick) -> Result<(), AppError> {
        self.clicks.lock().unwrap().push(click);
        Ok(())
    }
}

/// Settings store with fixed optional overrides.
#[derive(Default)]
pub struct MemorySettingsRepository {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn min_code_length(&self) -> Result<Option<i32>, AppError> {
        Ok(self.min)
    }

    async fn max_code_length(&self) -> Result<Option<i32>, AppError> {
        Ok(self.max)
    }
}

/// TTL-less cache over a `HashMap`, counting hits and misses.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Search client recording applied mutations, optionally failing the
/// first `fail_first` calls.
#[derive(Default)]
pub struct RecordingSearchClient {
    pub upserts: Mutex<Vec<LinkDocument>>,
    pub deletes: Mutex<Vec<i64>>,
    pub fail_first: AtomicUsize,
    calls: AtomicUsize,
}

impl RecordingSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(n: usize) -> Self {
        let client = Self::default();
        client.fail_first.store(n, Ordering::SeqCst);
        client
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.lock().unwrap().len()
    }

    fn should_fail(&self) -> bool {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        call < self.fail_first.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndexClient for RecordingSearchClient {
    async fn upsert(&self, doc: LinkDocument) -> SearchResult<()> {
        if self.should_fail() {
            return Err(SearchError::Request("simulated failure".to_string()));
        }
        self.upserts.lock().unwrap().push(doc);
        Ok(())
    }

    async fn delete(&self, link_id: i64) -> SearchResult<()> {
        if self.should_fail() {
            return Err(SearchError::Request("simulated failure".to_string()));
        }
        self.deletes.lock().unwrap().push(link_id);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
