//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access behind narrow interfaces. Concrete
//! implementations live in `crate::infrastructure::persistence`; mockall
//! mocks are generated for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - durable (code, domain) -> URL mapping
//! - [`DomainRepository`] - domain lookup
//! - [`AccessLogRepository`] - click audit rows
//! - [`SettingsRepository`] - runtime code-length overrides

pub mod access_log_repository;
pub mod domain_repository;
pub mod link_repository;
pub mod settings_repository;

pub use access_log_repository::AccessLogRepository;
pub use domain_repository::DomainRepository;
pub use link_repository::LinkRepository;
pub use settings_repository::SettingsRepository;

#[cfg(test)]
pub use access_log_repository::MockAccessLogRepository;
#[cfg(test)]
pub use domain_repository::MockDomainRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
