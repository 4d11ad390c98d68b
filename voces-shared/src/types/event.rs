use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `voces.{domain}.{entity}.{action}`
/// Example: `voces.suggestion.suggestion.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Directory events
    pub const DIRECTORY_USER_UPSERTED: &str = "voces.directory.user.upserted";

    // Suggestion events
    pub const SUGGESTION_CREATED: &str = "voces.suggestion.suggestion.created";
    pub const SUGGESTION_STATUS_CHANGED: &str = "voces.suggestion.suggestion.status_changed";
    pub const SUGGESTION_REJECTED_ATTEMPT: &str = "voces.suggestion.suggestion.rejected_attempt";

    // Library / school calendar events
    pub const LIBRARY_BOOK_ADDED: &str = "voces.library.book.added";
    pub const SCHOOL_EVENT_CREATED: &str = "voces.school.event.created";

    // Ranking events
    pub const RANKING_RECORD_SET: &str = "voces.ranking.record.set";

    // Notification events (consumed by the push delivery subsystem)
    pub const NOTIFICATION_CREATED: &str = "voces.notification.notification.created";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use crate::types::auth::UserRole;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserUpserted {
        pub user_id: Uuid,
        pub email: String,
        pub display_name: String,
        pub grade: String,
        pub group_name: String,
        pub role: UserRole,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SuggestionCreated {
        pub suggestion_id: Uuid,
        pub author_id: Uuid,
        pub author_name: String,
        pub title: String,
        pub grade: String,
        pub group_name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SuggestionStatusChanged {
        pub suggestion_id: Uuid,
        pub author_id: Uuid,
        pub title: String,
        pub status: String,
        pub admin_comment: Option<String>,
    }

    /// Audit payload for a submission that failed moderation. The suggestion
    /// itself is never persisted, so the offending text travels in the event.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SuggestionRejectedAttempt {
        pub author_id: Uuid,
        pub author_name: String,
        pub grade: String,
        pub group_name: String,
        pub title: String,
        pub body: String,
        pub reason: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BookAdded {
        pub book_id: Uuid,
        pub title: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SchoolEventCreated {
        pub event_id: Uuid,
        pub title: String,
        pub description: Option<String>,
    }

    /// A score that beat the previous best on a mini-game leaderboard.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RecordSet {
        pub game_key: String,
        pub player_id: Uuid,
        pub player_name: String,
        pub score: i64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NotificationCreated {
        pub notification_id: Uuid,
        pub recipient_id: Uuid,
        pub notification_type: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_user_and_correlation() {
        let user = Uuid::new_v4();
        let corr = Uuid::new_v4();
        let evt = Event::new("voces-community", routing_keys::SUGGESTION_CREATED, 42u32)
            .with_user(user)
            .with_correlation(corr);
        assert_eq!(evt.user_id, Some(user));
        assert_eq!(evt.correlation_id, Some(corr));
        assert_eq!(evt.event_type, "voces.suggestion.suggestion.created");
    }

    #[test]
    fn rejected_attempt_payload_json() {
        let evt = Event::new(
            "voces-community",
            routing_keys::SUGGESTION_REJECTED_ATTEMPT,
            payloads::SuggestionRejectedAttempt {
                author_id: Uuid::nil(),
                author_name: "Ana".into(),
                grade: "6".into(),
                group_name: "1".into(),
                title: "x".into(),
                body: "y".into(),
                reason: "demasiado corta".into(),
            },
        );
        let json = serde_json::to_string(&evt).unwrap();
        assert!(json.contains("\"reason\":\"demasiado corta\""));
        assert!(json.contains("voces.suggestion.suggestion.rejected_attempt"));
    }
}
