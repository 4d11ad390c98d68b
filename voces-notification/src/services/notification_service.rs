use diesel::prelude::*;
use uuid::Uuid;

use voces_shared::clients::db::DbPool;
use voces_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewNotification, Notification, NotificationType};
use crate::schema::notifications;

fn get_conn(pool: &DbPool) -> AppResult<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::pg::PgConnection>>> {
    pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })
}

/// Create a new notification row for a single recipient.
pub fn create_notification(
    pool: &DbPool,
    recipient_id: Uuid,
    notification_type: NotificationType,
    title: &str,
    body: &str,
    data: Option<serde_json::Value>,
) -> AppResult<Notification> {
    let mut conn = get_conn(pool)?;

    let new_notification = NewNotification {
        recipient_id,
        notification_type: notification_type.as_str().to_string(),
        title: title.to_string(),
        body: body.to_string(),
        data,
    };

    let notification = diesel::insert_into(notifications::table)
        .values(&new_notification)
        .get_result::<Notification>(&mut conn)?;

    tracing::debug!(
        notification_id = %notification.id,
        recipient_id = %recipient_id,
        notification_type = %notification_type,
        "notification created"
    );

    Ok(notification)
}

/// List notifications for a recipient with pagination, newest first.
/// `unread_only` narrows both the page and the total to unread rows.
pub fn list_notifications(
    pool: &DbPool,
    recipient_id: Uuid,
    unread_only: bool,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<Notification>, i64)> {
    let mut conn = get_conn(pool)?;

    let mut count_query = notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .into_boxed();
    let mut page_query = notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .into_boxed();
    if unread_only {
        count_query = count_query.filter(notifications::is_read.eq(false));
        page_query = page_query.filter(notifications::is_read.eq(false));
    }

    let total: i64 = count_query.count().get_result(&mut conn)?;

    let items = page_query
        .order(notifications::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<Notification>(&mut conn)?;

    Ok((items, total))
}

pub fn count_unread(pool: &DbPool, recipient_id: Uuid) -> AppResult<i64> {
    let mut conn = get_conn(pool)?;

    let count: i64 = notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .filter(notifications::is_read.eq(false))
        .count()
        .get_result(&mut conn)?;

    Ok(count)
}

/// Mark a single notification as read (only if it belongs to the recipient).
/// The read flag only ever moves false -> true.
pub fn mark_read(pool: &DbPool, notification_id: Uuid, recipient_id: Uuid) -> AppResult<Notification> {
    let mut conn = get_conn(pool)?;

    let notification = diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::recipient_id.eq(recipient_id)),
    )
    .set(notifications::is_read.eq(true))
    .get_result::<Notification>(&mut conn)
    .map_err(|e| match e {
        diesel::result::Error::NotFound => {
            AppError::new(ErrorCode::NotificationNotFound, "notification not found")
        }
        other => AppError::Database(other),
    })?;

    Ok(notification)
}

/// Mark all unread notifications as read for a recipient.
pub fn mark_all_read(pool: &DbPool, recipient_id: Uuid) -> AppResult<usize> {
    let mut conn = get_conn(pool)?;

    let updated = diesel::update(
        notifications::table
            .filter(notifications::recipient_id.eq(recipient_id))
            .filter(notifications::is_read.eq(false)),
    )
    .set(notifications::is_read.eq(true))
    .execute(&mut conn)?;

    Ok(updated)
}

/// Bulk delete every notification owned by the recipient.
pub fn delete_all(pool: &DbPool, recipient_id: Uuid) -> AppResult<usize> {
    let mut conn = get_conn(pool)?;

    let deleted = diesel::delete(
        notifications::table.filter(notifications::recipient_id.eq(recipient_id)),
    )
    .execute(&mut conn)?;

    tracing::debug!(recipient_id = %recipient_id, deleted = deleted, "notifications deleted");
    Ok(deleted)
}
