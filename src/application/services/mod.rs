//! Application services orchestrating repositories, cache, and pipelines.

pub mod domain_resolver;
pub mod link_service;
pub mod redirect_service;

pub use domain_resolver::DomainResolver;
pub use link_service::{CreateLinkRequest, CreatedLink, LinkPage, LinkService, ShortLink};
pub use redirect_service::{redirect_cache_key, CachedTarget, ClickMeta, RedirectService};
