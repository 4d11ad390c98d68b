use voces_shared::clients::rabbitmq::RabbitMQClient;
use voces_shared::types::auth::UserRole;
use voces_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Suggestion, User};

const SOURCE: &str = "voces-community";

pub async fn publish_suggestion_created(rabbitmq: &RabbitMQClient, suggestion: &Suggestion) {
    let event = Event::new(
        SOURCE,
        routing_keys::SUGGESTION_CREATED,
        payloads::SuggestionCreated {
            suggestion_id: suggestion.id,
            author_id: suggestion.author_id,
            author_name: suggestion.author_name.clone(),
            title: suggestion.title.clone(),
            grade: suggestion.grade.clone(),
            group_name: suggestion.group_name.clone(),
        },
    )
    .with_user(suggestion.author_id);

    if let Err(e) = rabbitmq.publish(&event).await {
        tracing::error!(error = %e, "failed to publish suggestion.created event");
    }
}

pub async fn publish_status_changed(
    rabbitmq: &RabbitMQClient,
    suggestion: &Suggestion,
    admin_comment: Option<String>,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::SUGGESTION_STATUS_CHANGED,
        payloads::SuggestionStatusChanged {
            suggestion_id: suggestion.id,
            author_id: suggestion.author_id,
            title: suggestion.title.clone(),
            status: suggestion.status.clone(),
            admin_comment,
        },
    )
    .with_user(suggestion.author_id);

    if let Err(e) = rabbitmq.publish(&event).await {
        tracing::error!(error = %e, "failed to publish suggestion.status_changed event");
    }
}

/// Audit trail for a submission that failed moderation. The suggestion is not
/// persisted, so the rejected text is carried in the event itself.
pub async fn publish_rejected_attempt(
    rabbitmq: &RabbitMQClient,
    author: &User,
    title: &str,
    body: &str,
    reason: &str,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::SUGGESTION_REJECTED_ATTEMPT,
        payloads::SuggestionRejectedAttempt {
            author_id: author.id,
            author_name: author.display_name.clone(),
            grade: author.grade.clone(),
            group_name: author.group_name.clone(),
            title: title.to_string(),
            body: body.to_string(),
            reason: reason.to_string(),
        },
    )
    .with_user(author.id);

    if let Err(e) = rabbitmq.publish(&event).await {
        tracing::error!(error = %e, "failed to publish suggestion.rejected_attempt event");
    }
}

pub async fn publish_user_upserted(rabbitmq: &RabbitMQClient, user: &User, role: UserRole) {
    let event = Event::new(
        SOURCE,
        routing_keys::DIRECTORY_USER_UPSERTED,
        payloads::UserUpserted {
            user_id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            grade: user.grade.clone(),
            group_name: user.group_name.clone(),
            role,
        },
    )
    .with_user(user.id);

    if let Err(e) = rabbitmq.publish(&event).await {
        tracing::error!(error = %e, "failed to publish directory.user.upserted event");
    }
}
