use std::sync::Arc;

use diesel::prelude::*;
use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;

use voces_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{NewDirectoryUser, NotificationType, SuggestionStatusKind};
use crate::schema::directory_users;
use crate::services::fanout;
use crate::AppState;

/// Listen for suggestion lifecycle events and fan them out.
pub async fn listen_suggestion_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "voces-notification.suggestion",
        &[
            routing_keys::SUGGESTION_CREATED,
            routing_keys::SUGGESTION_STATUS_CHANGED,
            routing_keys::SUGGESTION_REJECTED_ATTEMPT,
        ],
    ).await?;

    tracing::info!("listening for suggestion events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                let routing_key = delivery.routing_key.to_string();

                if routing_key == routing_keys::SUGGESTION_CREATED {
                    match serde_json::from_slice::<Event<payloads::SuggestionCreated>>(&delivery.data) {
                        Ok(event) => handle_suggestion_created(&state, &event.data).await,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize suggestion.created event");
                        }
                    }
                } else if routing_key == routing_keys::SUGGESTION_STATUS_CHANGED {
                    match serde_json::from_slice::<Event<payloads::SuggestionStatusChanged>>(&delivery.data) {
                        Ok(event) => handle_status_changed(&state, &event.data).await,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize suggestion.status_changed event");
                        }
                    }
                } else if routing_key == routing_keys::SUGGESTION_REJECTED_ATTEMPT {
                    match serde_json::from_slice::<Event<payloads::SuggestionRejectedAttempt>>(&delivery.data) {
                        Ok(event) => handle_rejected_attempt(&state, &event.data).await,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize suggestion.rejected_attempt event");
                        }
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "suggestion consumer error");
            }
        }
    }

    Ok(())
}

async fn handle_suggestion_created(state: &AppState, data: &payloads::SuggestionCreated) {
    tracing::info!(
        suggestion_id = %data.suggestion_id,
        grade = %data.grade,
        group = %data.group_name,
        "received suggestion.created event"
    );

    let admins = match fanout::admins_in_scope(&state.db, &data.grade, &data.group_name) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve admin audience");
            return;
        }
    };

    fanout::fan_out(
        &state.db,
        &state.rabbitmq,
        &admins,
        NotificationType::SuggestionPending,
        "Nueva sugerencia pendiente",
        &format!("{} envió una sugerencia: \"{}\"", data.author_name, data.title),
        Some(serde_json::json!({
            "suggestion_id": data.suggestion_id,
            "author_id": data.author_id,
            "grade": data.grade,
            "group": data.group_name,
        })),
    )
    .await;
}

async fn handle_status_changed(state: &AppState, data: &payloads::SuggestionStatusChanged) {
    tracing::info!(
        suggestion_id = %data.suggestion_id,
        status = %data.status,
        "received suggestion.status_changed event"
    );

    let Some(kind) = SuggestionStatusKind::from_status(&data.status) else {
        tracing::warn!(status = %data.status, "ignoring status change with unknown status");
        return;
    };

    let (notification_type, title) = match kind {
        SuggestionStatusKind::Approved => {
            (NotificationType::SuggestionApproved, "Sugerencia aprobada")
        }
        SuggestionStatusKind::Rejected => {
            (NotificationType::SuggestionRejected, "Sugerencia rechazada")
        }
    };

    let mut body = match kind {
        SuggestionStatusKind::Approved => {
            format!("Tu sugerencia \"{}\" fue aprobada.", data.title)
        }
        SuggestionStatusKind::Rejected => {
            format!("Tu sugerencia \"{}\" fue rechazada.", data.title)
        }
    };
    if let Some(comment) = data.admin_comment.as_deref().filter(|c| !c.is_empty()) {
        body.push_str(&format!(" Comentario: {comment}"));
    }

    // Audience is the single author.
    fanout::fan_out(
        &state.db,
        &state.rabbitmq,
        &[data.author_id],
        notification_type,
        title,
        &body,
        Some(serde_json::json!({
            "suggestion_id": data.suggestion_id,
            "status": data.status,
        })),
    )
    .await;
}

async fn handle_rejected_attempt(state: &AppState, data: &payloads::SuggestionRejectedAttempt) {
    tracing::info!(
        author_id = %data.author_id,
        grade = %data.grade,
        group = %data.group_name,
        "received suggestion.rejected_attempt event"
    );

    let admins = match fanout::admins_in_scope(&state.db, &data.grade, &data.group_name) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve admin audience");
            return;
        }
    };

    // Audit trail: admins see the reason and the offending text.
    fanout::fan_out(
        &state.db,
        &state.rabbitmq,
        &admins,
        NotificationType::InappropriateSuggestion,
        "Intento de sugerencia inapropiada",
        &format!(
            "{} envió contenido rechazado por moderación: {}",
            data.author_name, data.reason
        ),
        Some(serde_json::json!({
            "author_id": data.author_id,
            "title": data.title,
            "body": data.body,
            "reason": data.reason,
        })),
    )
    .await;
}

/// Listen for library, school calendar and leaderboard events. Catalog
/// additions notify every user; a leaderboard record notifies its player.
pub async fn listen_catalog_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "voces-notification.catalog",
        &[
            routing_keys::LIBRARY_BOOK_ADDED,
            routing_keys::SCHOOL_EVENT_CREATED,
            routing_keys::RANKING_RECORD_SET,
        ],
    ).await?;

    tracing::info!("listening for catalog events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                let routing_key = delivery.routing_key.to_string();

                if routing_key == routing_keys::LIBRARY_BOOK_ADDED {
                    match serde_json::from_slice::<Event<payloads::BookAdded>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            let recipients = fanout::all_users(&state.db).unwrap_or_else(|e| {
                                tracing::error!(error = %e, "failed to resolve all-users audience");
                                vec![]
                            });
                            fanout::fan_out(
                                &state.db,
                                &state.rabbitmq,
                                &recipients,
                                NotificationType::NewBook,
                                "Nuevo libro en la biblioteca",
                                &format!("Ya está disponible \"{}\".", data.title),
                                Some(serde_json::json!({ "book_id": data.book_id })),
                            )
                            .await;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize book.added event");
                        }
                    }
                } else if routing_key == routing_keys::SCHOOL_EVENT_CREATED {
                    match serde_json::from_slice::<Event<payloads::SchoolEventCreated>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            let recipients = fanout::all_users(&state.db).unwrap_or_else(|e| {
                                tracing::error!(error = %e, "failed to resolve all-users audience");
                                vec![]
                            });
                            let body = match data.description.as_deref() {
                                Some(desc) => format!("{}: {}", data.title, desc),
                                None => data.title.clone(),
                            };
                            fanout::fan_out(
                                &state.db,
                                &state.rabbitmq,
                                &recipients,
                                NotificationType::NewEvent,
                                "Nuevo evento escolar",
                                &body,
                                Some(serde_json::json!({ "event_id": data.event_id })),
                            )
                            .await;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize school.event.created event");
                        }
                    }
                } else if routing_key == routing_keys::RANKING_RECORD_SET {
                    match serde_json::from_slice::<Event<payloads::RecordSet>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            fanout::fan_out(
                                &state.db,
                                &state.rabbitmq,
                                &[data.player_id],
                                NotificationType::Achievement,
                                "¡Nuevo récord!",
                                &format!(
                                    "{} puntos, la mejor puntuación en {}.",
                                    data.score, data.game_key
                                ),
                                Some(serde_json::json!({
                                    "game_key": data.game_key,
                                    "score": data.score,
                                })),
                            )
                            .await;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize ranking.record.set event");
                        }
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog consumer error");
            }
        }
    }

    Ok(())
}

/// Maintain the directory read model used for audience resolution.
pub async fn listen_directory_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "voces-notification.directory",
        &[routing_keys::DIRECTORY_USER_UPSERTED],
    ).await?;

    tracing::info!("listening for directory events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::UserUpserted>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        if let Err(e) = upsert_directory_user(&state, data) {
                            tracing::error!(error = %e, user_id = %data.user_id, "failed to upsert directory user");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize directory.user.upserted event");
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "directory consumer error");
            }
        }
    }

    Ok(())
}

fn upsert_directory_user(state: &AppState, data: &payloads::UserUpserted) -> anyhow::Result<()> {
    let mut conn = state.db.get()?;

    diesel::insert_into(directory_users::table)
        .values(&NewDirectoryUser {
            id: data.user_id,
            email: data.email.clone(),
            display_name: data.display_name.clone(),
            grade: data.grade.clone(),
            group_name: data.group_name.clone(),
            role: data.role.to_string(),
        })
        .on_conflict(directory_users::id)
        .do_update()
        .set((
            directory_users::email.eq(&data.email),
            directory_users::display_name.eq(&data.display_name),
            directory_users::grade.eq(&data.grade),
            directory_users::group_name.eq(&data.group_name),
            directory_users::role.eq(data.role.to_string()),
            directory_users::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(&mut conn)?;

    tracing::debug!(user_id = %data.user_id, "directory user upserted");
    Ok(())
}
