//! DTOs for link listing.

use crate::application::services::link_service::{LinkPage, ShortLink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pagination query for `GET /api/links`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// One link in a listing.
#[derive(Debug, Serialize)]
pub struct LinkItem {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub title: Option<String>,
    pub domain_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ShortLink> for LinkItem {
    fn from(item: ShortLink) -> Self {
        Self {
            code: item.link.code,
            short_url: item.short_url,
            original_url: item.link.original_url,
            title: item.link.title,
            domain_id: item.link.domain_id,
            click_count: item.link.click_count,
            created_at: item.link.created_at,
        }
    }
}

/// One page of links with pagination metadata.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkItem>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl From<LinkPage> for LinkListResponse {
    fn from(page: LinkPage) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}
