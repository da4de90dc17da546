//! Click entity representing a single recorded redirect.

use chrono::{DateTime, Utc};

/// A persisted click on a short link.
///
/// References its [`crate::domain::entities::Link`] by id only and does not
/// own the link's lifecycle.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub ip_address: String,
}

impl Click {
    pub fn new(
        id: i64,
        link_id: i64,
        timestamp: DateTime<Utc>,
        user_agent: String,
        ip_address: String,
    ) -> Self {
        Self {
            id,
            link_id,
            timestamp,
            user_agent,
            ip_address,
        }
    }
}

/// Input data for recording a click.
///
/// Built by the click workers from a dequeued
/// [`crate::domain::click_event::ClickEvent`]; the timestamp is the moment of
/// the redirect, not the moment of persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub ip_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_creation() {
        let now = Utc::now();
        let click = Click::new(
            1,
            42,
            now,
            "Mozilla/5.0".to_string(),
            "192.168.1.1".to_string(),
        );

        assert_eq!(click.id, 1);
        assert_eq!(click.link_id, 42);
        assert_eq!(click.timestamp, now);
        assert_eq!(click.user_agent, "Mozilla/5.0");
        assert_eq!(click.ip_address, "192.168.1.1");
    }

    #[test]
    fn test_new_click_allows_empty_user_agent() {
        let new_click = NewClick {
            link_id: 99,
            timestamp: Utc::now(),
            user_agent: String::new(),
            ip_address: "10.0.0.1".to_string(),
        };

        assert_eq!(new_click.link_id, 99);
        assert!(new_click.user_agent.is_empty());
    }
}
