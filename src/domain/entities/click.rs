//! Click audit record written by the stats pipeline.

use chrono::{DateTime, Utc};

/// One click audit row, written unconditionally per raw click event.
///
/// Aggregated click counts live on the link itself; this row preserves the
/// per-request metadata for analytics.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}
