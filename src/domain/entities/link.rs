//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link with metadata.
///
/// `(domain_id, code)` is globally unique; `(owner_id, domain_id,
/// content_hash)` identifies at most one row and backs idempotent creation.
/// `owner_id = 0` is the system owner, `domain_id = 0` means the link has no
/// domain and short URLs fall back to the configured base URL.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub owner_id: i64,
    pub domain_id: i64,
    pub code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub content_hash: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub owner_id: i64,
    pub domain_id: i64,
    pub code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub content_hash: String,
}
