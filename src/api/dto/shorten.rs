//! DTOs for the link shortening endpoint.

use crate::application::services::link_service::CreatedLink;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Compiled regex for custom code validation. The full rules (edge
/// hyphens, reserved names) are enforced by the service layer.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The destination URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional custom short code.
    #[validate(length(min = 4, max = 32))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX"))]
    pub custom_code: Option<String>,

    /// Optional human-readable title, indexed for search.
    #[validate(length(max = 200))]
    pub title: Option<String>,

    /// Optional domain override (otherwise the default domain applies).
    pub domain_id: Option<i64>,
}

/// A created or idempotently-returned link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub title: Option<String>,
    pub domain_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    /// `false` when an identical submission returned the existing link.
    pub created: bool,
}

impl From<CreatedLink> for LinkResponse {
    fn from(outcome: CreatedLink) -> Self {
        Self {
            code: outcome.link.code,
            short_url: outcome.short_url,
            original_url: outcome.link.original_url,
            title: outcome.link.title,
            domain_id: outcome.link.domain_id,
            click_count: outcome.link.click_count,
            created_at: outcome.link.created_at,
            created: outcome.created,
        }
    }
}
