//! Audience resolution and per-recipient fan-out.
//!
//! A fan-out writes one notification row per resolved recipient. Individual
//! recipient failures are logged and skipped so a partial failure never
//! aborts the triggering operation.

use diesel::prelude::*;
use uuid::Uuid;

use voces_shared::clients::db::DbPool;
use voces_shared::clients::rabbitmq::RabbitMQClient;
use voces_shared::errors::{AppError, AppResult};
use voces_shared::types::auth::UserRole;
use voces_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{DirectoryUser, NotificationType};
use crate::schema::directory_users;
use crate::services::notification_service;

/// Admins of a (grade, group) scope, from the directory read model.
pub fn admins_in_scope(pool: &DbPool, grade: &str, group_name: &str) -> AppResult<Vec<Uuid>> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let admins = directory_users::table
        .filter(directory_users::grade.eq(grade))
        .filter(directory_users::group_name.eq(group_name))
        .filter(directory_users::role.eq(UserRole::Admin.to_string()))
        .load::<DirectoryUser>(&mut conn)?;

    Ok(admins.into_iter().map(|u| u.id).collect())
}

/// Every user in the directory read model.
pub fn all_users(pool: &DbPool) -> AppResult<Vec<Uuid>> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let ids = directory_users::table
        .select(directory_users::id)
        .load::<Uuid>(&mut conn)?;

    Ok(ids)
}

/// Write one notification per recipient and announce each row to the push
/// delivery subsystem. Returns how many rows were written.
pub async fn fan_out(
    pool: &DbPool,
    rabbitmq: &RabbitMQClient,
    recipients: &[Uuid],
    notification_type: NotificationType,
    title: &str,
    body: &str,
    data: Option<serde_json::Value>,
) -> usize {
    let mut delivered = 0;

    for recipient_id in recipients {
        let notification = match notification_service::create_notification(
            pool,
            *recipient_id,
            notification_type,
            title,
            body,
            data.clone(),
        ) {
            Ok(n) => n,
            Err(e) => {
                // Per-recipient failures must not abort the fan-out.
                tracing::error!(
                    error = %e,
                    recipient_id = %recipient_id,
                    notification_type = %notification_type,
                    "failed to create notification, skipping recipient"
                );
                continue;
            }
        };
        delivered += 1;

        let event = Event::new(
            "voces-notification",
            routing_keys::NOTIFICATION_CREATED,
            payloads::NotificationCreated {
                notification_id: notification.id,
                recipient_id: *recipient_id,
                notification_type: notification_type.as_str().to_string(),
            },
        )
        .with_user(*recipient_id);

        if let Err(e) = rabbitmq.publish(&event).await {
            tracing::error!(error = %e, "failed to publish notification.created event");
        }
    }

    tracing::info!(
        notification_type = %notification_type,
        recipients = recipients.len(),
        delivered = delivered,
        "fan-out complete"
    );

    delivered
}
