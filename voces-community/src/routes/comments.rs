use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use voces_shared::errors::{AppError, AppResult, ErrorCode};
use voces_shared::types::auth::AuthUser;
use voces_shared::types::ApiResponse;

use crate::models::{NewSuggestionComment, NewThreadRead, SuggestionComment, User};
use crate::routes::suggestions::load_suggestion;
use crate::schema::{suggestion_comments, suggestion_thread_reads, users};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// POST /suggestions/:id/comments — comments are append-only and immutable.
pub async fn add_comment(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<Json<ApiResponse<SuggestionComment>>> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    load_suggestion(&mut conn, suggestion_id)?;

    let author = users::table
        .find(user.id)
        .first::<User>(&mut conn)
        .optional()
        .map_err(|e| AppError::internal(format!("db error: {e}")))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "commenter not in directory"))?;

    let comment: SuggestionComment = diesel::insert_into(suggestion_comments::table)
        .values(&NewSuggestionComment {
            suggestion_id,
            author_id: author.id,
            author_name: author.display_name,
            body: req.body,
        })
        .get_result(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to add comment: {e}")))?;

    tracing::debug!(
        suggestion_id = %suggestion_id,
        comment_id = %comment.id,
        "comment appended"
    );
    Ok(Json(ApiResponse::ok(comment)))
}

/// GET /suggestions/:id/comments — oldest first, matching thread order.
pub async fn list_comments(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<SuggestionComment>>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    load_suggestion(&mut conn, suggestion_id)?;

    let comments = suggestion_comments::table
        .filter(suggestion_comments::suggestion_id.eq(suggestion_id))
        .order(suggestion_comments::created_at.asc())
        .load::<SuggestionComment>(&mut conn)
        .map_err(|e| AppError::internal(format!("db error: {e}")))?;

    Ok(Json(ApiResponse::ok(comments)))
}

/// POST /suggestions/:id/read — idempotent read receipt for the thread.
pub async fn mark_thread_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(suggestion_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    load_suggestion(&mut conn, suggestion_id)?;

    diesel::insert_into(suggestion_thread_reads::table)
        .values(&NewThreadRead {
            suggestion_id,
            user_id: user.id,
        })
        .on_conflict((
            suggestion_thread_reads::suggestion_id,
            suggestion_thread_reads::user_id,
        ))
        .do_nothing()
        .execute(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to mark thread read: {e}")))?;

    Ok(Json(ApiResponse::ok(())))
}
