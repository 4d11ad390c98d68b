use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{directory_users, notifications};

/// Closed set of notification kinds. Stored as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewBook,
    SuggestionApproved,
    SuggestionRejected,
    NewEvent,
    SuggestionPending,
    InappropriateSuggestion,
    Suggestion,
    Library,
    Event,
    Push,
    Document,
    Achievement,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::NewBook => "new_book",
            NotificationType::SuggestionApproved => "suggestion_approved",
            NotificationType::SuggestionRejected => "suggestion_rejected",
            NotificationType::NewEvent => "new_event",
            NotificationType::SuggestionPending => "suggestion_pending",
            NotificationType::InappropriateSuggestion => "inappropriate_suggestion",
            NotificationType::Suggestion => "suggestion",
            NotificationType::Library => "library",
            NotificationType::Event => "event",
            NotificationType::Push => "push",
            NotificationType::Document => "document",
            NotificationType::Achievement => "achievement",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_book" => Ok(NotificationType::NewBook),
            "suggestion_approved" => Ok(NotificationType::SuggestionApproved),
            "suggestion_rejected" => Ok(NotificationType::SuggestionRejected),
            "new_event" => Ok(NotificationType::NewEvent),
            "suggestion_pending" => Ok(NotificationType::SuggestionPending),
            "inappropriate_suggestion" => Ok(NotificationType::InappropriateSuggestion),
            "suggestion" => Ok(NotificationType::Suggestion),
            "library" => Ok(NotificationType::Library),
            "event" => Ok(NotificationType::Event),
            "push" => Ok(NotificationType::Push),
            "document" => Ok(NotificationType::Document),
            "achievement" => Ok(NotificationType::Achievement),
            _ => Err(format!("unknown notification type: {s}")),
        }
    }
}

/// Reviewed statuses that produce an author notification. A status-change
/// event carrying anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionStatusKind {
    Approved,
    Rejected,
}

impl SuggestionStatusKind {
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "approved" => Some(SuggestionStatusKind::Approved),
            "rejected" => Some(SuggestionStatusKind::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub data: Option<serde_json::Value>,
}

/// Read model of the community service's user directory, maintained from
/// `voces.directory.user.upserted` events.
#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = directory_users)]
pub struct DirectoryUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub grade: String,
    pub group_name: String,
    pub role: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = directory_users)]
pub struct NewDirectoryUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub grade: String,
    pub group_name: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn notification_type_round_trip() {
        let all = [
            NotificationType::NewBook,
            NotificationType::SuggestionApproved,
            NotificationType::SuggestionRejected,
            NotificationType::NewEvent,
            NotificationType::SuggestionPending,
            NotificationType::InappropriateSuggestion,
            NotificationType::Suggestion,
            NotificationType::Library,
            NotificationType::Event,
            NotificationType::Push,
            NotificationType::Document,
            NotificationType::Achievement,
        ];
        for t in all {
            assert_eq!(NotificationType::from_str(t.as_str()).unwrap(), t);
        }
        assert!(NotificationType::from_str("sms").is_err());
    }

    #[test]
    fn only_reviewed_statuses_notify_the_author() {
        assert_eq!(
            SuggestionStatusKind::from_status("approved"),
            Some(SuggestionStatusKind::Approved)
        );
        assert_eq!(
            SuggestionStatusKind::from_status("rejected"),
            Some(SuggestionStatusKind::Rejected)
        );
        assert_eq!(SuggestionStatusKind::from_status("pending"), None);
    }

    #[test]
    fn serde_matches_storage_form() {
        let json = serde_json::to_string(&NotificationType::InappropriateSuggestion).unwrap();
        assert_eq!(json, "\"inappropriate_suggestion\"");
    }
}
