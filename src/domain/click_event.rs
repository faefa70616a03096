//! Click event model for asynchronous click tracking.

use crate::domain::entities::NewClick;
use chrono::{DateTime, Utc};

/// An in-memory click event passed from the redirect path to the stats
/// pipeline via a bounded channel.
///
/// Created per request and consumed exactly once by the pipeline (or
/// dropped when the queue is saturated). Keyed by `link_id` so the
/// consumer can aggregate click-count increments per link.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(
        link_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
            clicked_at: Utc::now(),
        }
    }

    /// Converts the event into the audit row the pipeline persists.
    pub fn into_click(self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            ip: self.ip,
            user_agent: self.user_agent,
            referer: self.referer,
            clicked_at: self.clicked_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_full() {
        let event = ClickEvent::new(
            7,
            Some("192.168.1.1".to_string()),
            Some("Mozilla/5.0"),
            Some("https://google.com"),
        );

        assert_eq!(event.link_id, 7);
        assert_eq!(event.ip, Some("192.168.1.1".to_string()));
        assert_eq!(event.user_agent, Some("Mozilla/5.0".to_string()));
        assert_eq!(event.referer, Some("https://google.com".to_string()));
    }

    #[test]
    fn test_click_event_creation_minimal() {
        let event = ClickEvent::new(3, None, None, None);

        assert_eq!(event.link_id, 3);
        assert!(event.ip.is_none());
        assert!(event.user_agent.is_none());
        assert!(event.referer.is_none());
    }

    #[test]
    fn test_into_click_carries_metadata() {
        let event = ClickEvent::new(9, Some("10.0.0.1".to_string()), Some("Safari"), None);
        let ts = event.clicked_at;
        let click = event.into_click();

        assert_eq!(click.link_id, 9);
        assert_eq!(click.ip, Some("10.0.0.1".to_string()));
        assert_eq!(click.user_agent, Some("Safari".to_string()));
        assert_eq!(click.clicked_at, ts);
    }
}
