//! PostgreSQL-backed repository implementations.

mod pg_access_log_repository;
mod pg_domain_repository;
mod pg_link_repository;
mod pg_settings_repository;

pub use pg_access_log_repository::PgAccessLogRepository;
pub use pg_domain_repository::PgDomainRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_settings_repository::PgSettingsRepository;
