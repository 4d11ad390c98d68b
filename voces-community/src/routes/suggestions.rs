use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use voces_shared::errors::{AppError, AppResult, ErrorCode};
use voces_shared::middleware::AdminUser;
use voces_shared::types::auth::{AuthUser, UserRole};
use voces_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{NewSuggestion, Suggestion, SuggestionStatus, User};
use crate::moderation::{self, Verdict};
use crate::schema::{suggestions, users};
use crate::AppState;

// --- Request types ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSuggestionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditSuggestionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String, // "approved" or "rejected"
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScopeParams {
    pub grade: String,
    #[serde(rename = "group")]
    pub group_name: String,
}

// --- Create (validated submission) ---

/// Suggestions come from students; admins review them, they don't file them.
fn may_submit(role: UserRole) -> bool {
    role != UserRole::Admin
}

pub async fn create_suggestion(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSuggestionRequest>,
) -> AppResult<Json<ApiResponse<Suggestion>>> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    if !may_submit(user.role) {
        return Err(AppError::forbidden("admins cannot submit suggestions"));
    }

    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    // Author display name and scope are denormalized from the directory.
    let author = users::table
        .find(user.id)
        .first::<User>(&mut conn)
        .optional()
        .map_err(|e| AppError::internal(format!("db error: {e}")))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "author not in directory"))?;

    // Moderation is a hard gate. Rejections are not silent: every admin of the
    // author's (grade, group) gets an audit notification with the offending text.
    if let Verdict::Rejected { reason } =
        moderation::validate(&req.title, &req.body, &state.config.moderation)
    {
        tracing::info!(
            author_id = %author.id,
            grade = %author.grade,
            group = %author.group_name,
            reason = %reason,
            "suggestion rejected by moderation"
        );
        publisher::publish_rejected_attempt(&state.rabbitmq, &author, &req.title, &req.body, &reason)
            .await;
        return Err(AppError::new(ErrorCode::SuggestionRejected, reason));
    }

    let new_suggestion = NewSuggestion {
        title: req.title,
        body: req.body,
        grade: author.grade.clone(),
        group_name: author.group_name.clone(),
        author_id: author.id,
        author_name: author.display_name.clone(),
        status: SuggestionStatus::Pending.as_str().to_string(),
    };

    let suggestion: Suggestion = diesel::insert_into(suggestions::table)
        .values(&new_suggestion)
        .get_result(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to create suggestion: {e}")))?;

    // Fan-out happens downstream; a publish failure never rolls back the insert.
    publisher::publish_suggestion_created(&state.rabbitmq, &suggestion).await;

    tracing::info!(suggestion_id = %suggestion.id, author_id = %author.id, "suggestion created");
    Ok(Json(ApiResponse::ok(suggestion)))
}

// --- List (admins see the whole scope, students only their own) ---

pub async fn list_suggestions(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(scope): Query<ScopeParams>,
) -> AppResult<Json<ApiResponse<Vec<Suggestion>>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let base = suggestions::table
        .filter(suggestions::grade.eq(&scope.grade))
        .filter(suggestions::group_name.eq(&scope.group_name))
        .order(suggestions::created_at.desc());

    let items: Vec<Suggestion> = if user.is_admin() {
        base.load(&mut conn)
            .map_err(|e| AppError::internal(format!("db error: {e}")))?
    } else {
        base.filter(suggestions::author_id.eq(user.id))
            .load(&mut conn)
            .map_err(|e| AppError::internal(format!("db error: {e}")))?
    };

    Ok(Json(ApiResponse::ok(items)))
}

pub async fn get_suggestion(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Suggestion>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let suggestion = load_suggestion(&mut conn, suggestion_id)?;
    Ok(Json(ApiResponse::ok(suggestion)))
}

// --- Edit (author only) ---

pub async fn edit_suggestion(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
    Json(req): Json<EditSuggestionRequest>,
) -> AppResult<Json<ApiResponse<Suggestion>>> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let suggestion = load_suggestion(&mut conn, suggestion_id)?;
    if suggestion.author_id != user.id {
        return Err(AppError::new(
            ErrorCode::NotSuggestionAuthor,
            "only the author can edit a suggestion",
        ));
    }

    // Edited text goes through the same moderation gate as a fresh submission.
    if let Verdict::Rejected { reason } =
        moderation::validate(&req.title, &req.body, &state.config.moderation)
    {
        return Err(AppError::new(ErrorCode::SuggestionRejected, reason));
    }

    let updated: Suggestion = diesel::update(suggestions::table.find(suggestion_id))
        .set((
            suggestions::title.eq(&req.title),
            suggestions::body.eq(&req.body),
        ))
        .get_result(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to edit suggestion: {e}")))?;

    Ok(Json(ApiResponse::ok(updated)))
}

// --- Delete (author or admin, only while still pending) ---

pub async fn delete_suggestion(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let suggestion = load_suggestion(&mut conn, suggestion_id)?;

    if suggestion.author_id != user.id && !user.is_admin() {
        return Err(AppError::new(
            ErrorCode::NotSuggestionAuthor,
            "only the author or an admin can delete a suggestion",
        ));
    }

    if suggestion.status != SuggestionStatus::Pending.as_str() {
        return Err(AppError::new(
            ErrorCode::SuggestionLocked,
            "a reviewed suggestion can no longer be deleted",
        ));
    }

    diesel::delete(suggestions::table.find(suggestion_id))
        .execute(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to delete suggestion: {e}")))?;

    tracing::info!(suggestion_id = %suggestion_id, requester_id = %user.id, "suggestion deleted");
    Ok(Json(ApiResponse::ok(())))
}

// --- Status transition (admin review) ---

pub async fn set_status(
    admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<ApiResponse<Suggestion>>> {
    let status = SuggestionStatus::from_str(&req.status)
        .map_err(|e| AppError::new(ErrorCode::InvalidSuggestionStatus, e))?;
    if status == SuggestionStatus::Pending {
        return Err(AppError::new(
            ErrorCode::InvalidSuggestionStatus,
            "a suggestion cannot be moved back to pending",
        ));
    }

    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    // 404 before update so an unknown id doesn't surface as a DB error.
    load_suggestion(&mut conn, suggestion_id)?;

    let updated: Suggestion = diesel::update(suggestions::table.find(suggestion_id))
        .set(suggestions::status.eq(status.as_str()))
        .get_result(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to update status: {e}")))?;

    publisher::publish_status_changed(&state.rabbitmq, &updated, req.comment).await;

    tracing::info!(
        suggestion_id = %suggestion_id,
        status = %status,
        admin_id = %admin.0.id,
        "suggestion status changed"
    );
    Ok(Json(ApiResponse::ok(updated)))
}

pub(crate) fn load_suggestion(
    conn: &mut diesel::pg::PgConnection,
    suggestion_id: Uuid,
) -> AppResult<Suggestion> {
    suggestions::table
        .find(suggestion_id)
        .first::<Suggestion>(conn)
        .optional()
        .map_err(|e| AppError::internal(format!("db error: {e}")))?
        .ok_or_else(|| AppError::new(ErrorCode::SuggestionNotFound, "suggestion not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_students_may_submit() {
        assert!(may_submit(UserRole::Student));
        assert!(!may_submit(UserRole::Admin));
    }
}
