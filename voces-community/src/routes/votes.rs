use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use voces_shared::errors::{AppError, AppResult, ErrorCode};
use voces_shared::types::auth::AuthUser;
use voces_shared::types::ApiResponse;

use crate::models::{NewSuggestionVote, SuggestionVote};
use crate::routes::suggestions::load_suggestion;
use crate::schema::{suggestion_votes, suggestions};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub is_like: bool,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub suggestion_id: Uuid,
    pub vote: VoteKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
    None,
}

impl VoteKind {
    fn from_row(row: Option<&SuggestionVote>) -> Self {
        match row {
            Some(v) if v.is_like => VoteKind::Like,
            Some(_) => VoteKind::Dislike,
            None => VoteKind::None,
        }
    }
}

/// What the transactional write has to do given the voter's current row.
/// A voter owns at most one row per suggestion, so like/dislike exclusivity
/// falls out of the single-row update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoteTransition {
    Insert,
    Keep,
    Flip,
}

fn plan_vote(existing: Option<bool>, is_like: bool) -> VoteTransition {
    match existing {
        None => VoteTransition::Insert,
        Some(current) if current == is_like => VoteTransition::Keep,
        Some(_) => VoteTransition::Flip,
    }
}

/// POST /suggestions/:id/vote — toggle-replace semantics under a row lock.
pub async fn cast_vote(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> AppResult<Json<ApiResponse<VoteResponse>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let vote: SuggestionVote = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            // Lock the suggestion row for the duration of the write. Votes on
            // the same suggestion serialize behind it, so two concurrent first
            // votes cannot both miss the existing-row check and double-insert.
            // The UNIQUE (suggestion_id, voter_id) index backstops the lock.
            suggestions::table
                .find(suggestion_id)
                .select(suggestions::id)
                .for_update()
                .first::<Uuid>(conn)?;

            let existing: Option<SuggestionVote> = suggestion_votes::table
                .filter(suggestion_votes::suggestion_id.eq(suggestion_id))
                .filter(suggestion_votes::voter_id.eq(user.id))
                .for_update()
                .first(conn)
                .optional()?;

            match (plan_vote(existing.as_ref().map(|v| v.is_like), req.is_like), existing) {
                (VoteTransition::Insert, _) => diesel::insert_into(suggestion_votes::table)
                    .values(&NewSuggestionVote {
                        suggestion_id,
                        voter_id: user.id,
                        is_like: req.is_like,
                    })
                    .get_result(conn),
                (VoteTransition::Keep, Some(row)) => Ok(row),
                (VoteTransition::Flip, Some(row)) => {
                    diesel::update(suggestion_votes::table.find(row.id))
                        .set(suggestion_votes::is_like.eq(req.is_like))
                        .get_result(conn)
                }
                // plan_vote only yields Keep/Flip for an existing row.
                (_, None) => Err(diesel::result::Error::RollbackTransaction),
            }
        })
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                AppError::new(ErrorCode::SuggestionNotFound, "suggestion not found")
            }
            other => AppError::internal(format!("vote transaction failed: {other}")),
        })?;

    tracing::debug!(
        suggestion_id = %suggestion_id,
        voter_id = %user.id,
        is_like = vote.is_like,
        "vote recorded"
    );

    Ok(Json(ApiResponse::ok(VoteResponse {
        suggestion_id,
        vote: VoteKind::from_row(Some(&vote)),
    })))
}

/// GET /suggestions/:id/vote — derived, never stored as a separate flag.
pub async fn get_vote(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VoteResponse>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    load_suggestion(&mut conn, suggestion_id)?;

    let existing: Option<SuggestionVote> = suggestion_votes::table
        .filter(suggestion_votes::suggestion_id.eq(suggestion_id))
        .filter(suggestion_votes::voter_id.eq(user.id))
        .first(&mut conn)
        .optional()
        .map_err(|e| AppError::internal(format!("db error: {e}")))?;

    Ok(Json(ApiResponse::ok(VoteResponse {
        suggestion_id,
        vote: VoteKind::from_row(existing.as_ref()),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_vote_inserts() {
        assert_eq!(plan_vote(None, true), VoteTransition::Insert);
        assert_eq!(plan_vote(None, false), VoteTransition::Insert);
    }

    #[test]
    fn revoting_the_same_direction_is_idempotent() {
        assert_eq!(plan_vote(Some(true), true), VoteTransition::Keep);
        assert_eq!(plan_vote(Some(false), false), VoteTransition::Keep);
    }

    #[test]
    fn opposite_vote_replaces_not_duplicates() {
        assert_eq!(plan_vote(Some(true), false), VoteTransition::Flip);
        assert_eq!(plan_vote(Some(false), true), VoteTransition::Flip);
    }

    #[test]
    fn vote_rows_are_unique_per_voter_in_the_schema() {
        // The row lock in cast_vote serializes writers; the unique pairing
        // below is what guarantees disjointness even outside that path.
        let ddl = include_str!(
            "../../migrations/2026-08-20-000000_initial_schema/up.sql"
        );
        assert!(ddl.contains("UNIQUE (suggestion_id, voter_id)"));
    }

    #[test]
    fn voter_always_ends_in_exactly_one_set() {
        // After any transition the voter's single row carries the requested
        // direction, so membership in likes and dislikes stays disjoint.
        for existing in [None, Some(true), Some(false)] {
            for is_like in [true, false] {
                let transition = plan_vote(existing, is_like);
                let resulting = match transition {
                    VoteTransition::Keep => existing.unwrap(),
                    VoteTransition::Insert | VoteTransition::Flip => is_like,
                };
                assert_eq!(resulting, is_like);
            }
        }
    }
}
