use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::ranking_entries)]
pub struct RankingEntry {
    pub id: Uuid,
    pub game_key: String,
    pub player_id: Uuid,
    pub player_name: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::ranking_entries)]
pub struct NewRankingEntry {
    pub game_key: String,
    pub player_id: Uuid,
    pub player_name: String,
    pub score: i64,
}
