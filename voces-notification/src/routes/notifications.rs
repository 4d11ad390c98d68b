use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use voces_shared::errors::AppResult;
use voces_shared::types::api::ApiResponse;
use voces_shared::types::auth::AuthUser;
use voces_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::Notification;
use crate::services::notification_service;
use crate::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct InboxQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(default)]
    pub unread_only: bool,
}

/// GET /notifications?unread_only=
/// List the authenticated user's notifications with pagination, newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<ApiResponse<Paginated<Notification>>>> {
    let limit = query.pagination.limit() as i64;
    let offset = query.pagination.offset() as i64;

    let (items, total) = notification_service::list_notifications(
        &state.db,
        auth_user.id,
        query.unread_only,
        limit,
        offset,
    )?;

    let paginated = Paginated::new(items, total as u64, &query.pagination);
    Ok(Json(ApiResponse::ok(paginated)))
}

#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<UnreadCountResponse>>> {
    let count = notification_service::count_unread(&state.db, auth_user.id)?;

    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

/// POST /notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = notification_service::mark_read(&state.db, id, auth_user.id)?;

    Ok(Json(ApiResponse::ok(notification)))
}

#[derive(Debug, serde::Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

/// POST /notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<MarkAllReadResponse>>> {
    let updated = notification_service::mark_all_read(&state.db, auth_user.id)?;

    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}

#[derive(Debug, serde::Serialize)]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

/// DELETE /notifications — clear the authenticated user's inbox.
pub async fn delete_all(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<DeleteAllResponse>>> {
    let deleted = notification_service::delete_all(&state.db, auth_user.id)?;

    Ok(Json(ApiResponse::ok(DeleteAllResponse { deleted })))
}
