//! Maps request hosts and creation requests to serving domains.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::Domain;
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;
use crate::utils::host::{base_url_host, normalize_host, HostParts};

/// Owner scope for system-wide records.
pub const SYSTEM_OWNER_ID: i64 = 0;

/// Domain id of links served only from the configured base URL.
pub const NO_DOMAIN_ID: i64 = 0;

/// Resolves which domain namespace a request or a new link belongs to.
///
/// Resolution is fail-closed: a hostname matching more than one active
/// domain is a configuration error and yields a conflict rather than an
/// arbitrary pick.
pub struct DomainResolver {
    domains: Arc<dyn DomainRepository>,
    base: HostParts,
    base_url: String,
}

impl DomainResolver {
    pub fn new(domains: Arc<dyn DomainRepository>, base_url: &str) -> Self {
        Self {
            domains,
            base: base_url_host(base_url),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves the `Host` header of an incoming redirect request to a
    /// domain id.
    ///
    /// The configured base host (and a missing host) resolve to the system
    /// default domain, or to [`NO_DOMAIN_ID`] when none is configured. Any
    /// other hostname must match exactly one active domain.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - hostname matches no active domain
    /// - [`AppError::Conflict`] - hostname matches several active domains
    pub async fn resolve_request_host(&self, raw_host: &str) -> Result<i64, AppError> {
        let parts = normalize_host(raw_host);

        if parts.is_empty() || parts.matches(&self.base) {
            return match self.domains.get_default(SYSTEM_OWNER_ID).await? {
                Some(domain) => Ok(domain.id),
                None => Ok(NO_DOMAIN_ID),
            };
        }

        let mut matches = self.domains.find_active_by_name(&parts.hostport).await?;
        if matches.is_empty() && parts.host != parts.hostport {
            matches = self.domains.find_active_by_name(&parts.host).await?;
        }

        match matches.len() {
            0 => Err(AppError::not_found(
                "Unknown domain",
                json!({ "host": parts.host }),
            )),
            1 => {
                debug!("Resolved host {} to domain {}", parts.host, matches[0].id);
                Ok(matches[0].id)
            }
            n => {
                warn!("Host {} matches {} active domains", parts.host, n);
                Err(AppError::conflict(
                    "Ambiguous domain configuration",
                    json!({ "host": parts.host, "matches": n }),
                ))
            }
        }
    }

    /// Picks the domain a new link is created under.
    ///
    /// An explicit `domain_id` must name an active domain visible to the
    /// owner. Without one the owner's default domain applies, then the
    /// system default, then no domain at all.
    pub async fn domain_for_owner(
        &self,
        owner_id: i64,
        domain_id: Option<i64>,
    ) -> Result<Option<Domain>, AppError> {
        if let Some(id) = domain_id {
            let domain = self.domains.find_by_id(id).await?.ok_or_else(|| {
                AppError::not_found("Domain not found", json!({ "domain_id": id }))
            })?;

            if domain.owner_id != owner_id && domain.owner_id != SYSTEM_OWNER_ID {
                return Err(AppError::not_found(
                    "Domain not found",
                    json!({ "domain_id": id }),
                ));
            }
            if !domain.is_active {
                return Err(AppError::bad_request(
                    "Domain is not active",
                    json!({ "domain_id": id }),
                ));
            }
            return Ok(Some(domain));
        }

        if let Some(domain) = self.domains.get_default(owner_id).await? {
            return Ok(Some(domain));
        }
        if owner_id != SYSTEM_OWNER_ID
            && let Some(domain) = self.domains.get_default(SYSTEM_OWNER_ID).await?
        {
            return Ok(Some(domain));
        }

        Ok(None)
    }

    /// Short-URL prefix for a link's domain, falling back to the base URL.
    pub fn url_prefix(&self, domain: Option<&Domain>) -> String {
        match domain {
            Some(d) => d.url_prefix(),
            None => self.base_url.clone(),
        }
    }
}
