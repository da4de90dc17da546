//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory click captured by the redirect handler.
///
/// Passed from the HTTP handler to the click workers through the
/// [`crate::domain::click_queue::ClickQueue`], decoupling the redirect
/// response from the database write.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler with request metadata
/// 2. Offered to the queue without blocking (dropped when full)
/// 3. Dequeued by exactly one worker
/// 4. Converted to [`NewClick`] for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub ip_address: String,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// A missing User-Agent header is recorded as an empty string.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(42, Some("Mozilla/5.0"), "192.168.1.1".to_string());
    /// ```
    pub fn new(link_id: i64, user_agent: Option<&str>, ip_address: String) -> Self {
        Self {
            link_id,
            timestamp: Utc::now(),
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip_address,
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        NewClick {
            link_id: event.link_id,
            timestamp: event.timestamp,
            user_agent: event.user_agent,
            ip_address: event.ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_full() {
        let before = Utc::now();
        let event = ClickEvent::new(7, Some("Mozilla/5.0"), "192.168.1.1".to_string());

        assert_eq!(event.link_id, 7);
        assert_eq!(event.user_agent, "Mozilla/5.0");
        assert_eq!(event.ip_address, "192.168.1.1");
        assert!(event.timestamp >= before);
    }

    #[test]
    fn test_click_event_missing_user_agent() {
        let event = ClickEvent::new(1, None, "10.0.0.1".to_string());

        assert!(event.user_agent.is_empty());
    }

    #[test]
    fn test_click_event_into_new_click_keeps_fields() {
        let event = ClickEvent::new(3, Some("curl/8.0"), "127.0.0.1".to_string());
        let timestamp = event.timestamp;

        let new_click: NewClick = event.into();

        assert_eq!(new_click.link_id, 3);
        assert_eq!(new_click.timestamp, timestamp);
        assert_eq!(new_click.user_agent, "curl/8.0");
        assert_eq!(new_click.ip_address, "127.0.0.1");
    }
}
