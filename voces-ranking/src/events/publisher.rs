use voces_shared::clients::rabbitmq::RabbitMQClient;
use voces_shared::types::event::{payloads, routing_keys, Event};

use crate::models::RankingEntry;

const SOURCE: &str = "voces-ranking";

/// Announces a score that beat the previous best on its board. Consumed by
/// the notification service, which congratulates the player.
pub async fn publish_record_set(rabbitmq: &RabbitMQClient, entry: &RankingEntry) {
    let event = Event::new(
        SOURCE,
        routing_keys::RANKING_RECORD_SET,
        payloads::RecordSet {
            game_key: entry.game_key.clone(),
            player_id: entry.player_id,
            player_name: entry.player_name.clone(),
            score: entry.score,
        },
    )
    .with_user(entry.player_id);

    if let Err(e) = rabbitmq.publish(&event).await {
        tracing::error!(error = %e, "failed to publish ranking.record.set event");
    }
}
