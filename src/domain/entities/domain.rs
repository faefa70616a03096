//! Domain entity: a hostname serving short links.

use chrono::{DateTime, Utc};

/// A hostname namespace for short codes.
///
/// `owner_id = 0` marks a system domain. At most one active default exists
/// per owner scope.
#[derive(Debug, Clone)]
pub struct Domain {
    pub id: i64,
    pub owner_id: i64,
    pub hostname: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Domain {
    /// Full URL prefix for this domain, defaulting the scheme to https
    /// when the hostname is stored bare.
    pub fn url_prefix(&self) -> String {
        let host = self.hostname.trim();
        if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        }
    }
}
