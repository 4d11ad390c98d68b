use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use voces_shared::errors::{AppError, AppResult, ErrorCode};
use voces_shared::types::auth::UserRole;
use voces_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub grade: String,
    #[serde(rename = "group")]
    pub group_name: String,
    pub role: UserRole,
}

/// PUT /internal/users — directory sync from the auth system
/// (service-to-service, no end-user auth).
pub async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let new_user = NewUser {
        id: req.id,
        email: req.email.clone(),
        display_name: req.display_name.clone(),
        grade: req.grade.clone(),
        group_name: req.group_name.clone(),
        role: req.role.to_string(),
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .on_conflict(users::id)
        .do_update()
        .set((
            users::email.eq(&req.email),
            users::display_name.eq(&req.display_name),
            users::grade.eq(&req.grade),
            users::group_name.eq(&req.group_name),
            users::role.eq(req.role.to_string()),
        ))
        .get_result(&mut conn)
        .map_err(|e| AppError::internal(format!("failed to upsert user: {e}")))?;

    // Downstream read models (notification fan-out) follow this event.
    publisher::publish_user_upserted(&state.rabbitmq, &user, req.role).await;

    tracing::info!(user_id = %user.id, role = %req.role, "directory user upserted");
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /internal/users/:id (service-to-service, no end-user auth).
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let user = users::table
        .find(user_id)
        .first::<User>(&mut conn)
        .optional()
        .map_err(|e| AppError::internal(format!("db error: {e}")))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "user not found"))?;

    Ok(Json(ApiResponse::ok(user)))
}
