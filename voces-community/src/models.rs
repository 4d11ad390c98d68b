use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{suggestion_comments, suggestion_thread_reads, suggestion_votes, suggestions, users};

// --- Directory user ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub grade: String,
    pub group_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub grade: String,
    pub group_name: String,
    pub role: String,
}

// --- Suggestion ---

/// Workflow state of a suggestion. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SuggestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SuggestionStatus::Pending),
            "approved" => Ok(SuggestionStatus::Approved),
            "rejected" => Ok(SuggestionStatus::Rejected),
            _ => Err(format!("unknown suggestion status: {s}")),
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = suggestions)]
pub struct Suggestion {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub grade: String,
    pub group_name: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = suggestions)]
pub struct NewSuggestion {
    pub title: String,
    pub body: String,
    pub grade: String,
    pub group_name: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub status: String,
}

// --- Vote ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = suggestion_votes)]
pub struct SuggestionVote {
    pub id: Uuid,
    pub suggestion_id: Uuid,
    pub voter_id: Uuid,
    pub is_like: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = suggestion_votes)]
pub struct NewSuggestionVote {
    pub suggestion_id: Uuid,
    pub voter_id: Uuid,
    pub is_like: bool,
}

// --- Comment ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = suggestion_comments)]
pub struct SuggestionComment {
    pub id: Uuid,
    pub suggestion_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = suggestion_comments)]
pub struct NewSuggestionComment {
    pub suggestion_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub body: String,
}

// --- Thread read receipt ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = suggestion_thread_reads)]
pub struct ThreadRead {
    pub id: Uuid,
    pub suggestion_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = suggestion_thread_reads)]
pub struct NewThreadRead {
    pub suggestion_id: Uuid,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trip() {
        for status in [
            SuggestionStatus::Pending,
            SuggestionStatus::Approved,
            SuggestionStatus::Rejected,
        ] {
            assert_eq!(SuggestionStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(SuggestionStatus::from_str("archived").is_err());
    }
}
