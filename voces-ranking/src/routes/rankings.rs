use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use voces_shared::errors::{AppError, AppResult, ErrorCode};
use voces_shared::types::auth::AuthUser;
use voces_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{NewRankingEntry, RankingEntry};
use crate::schema::ranking_entries;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitScoreRequest {
    #[validate(length(min = 1, max = 100))]
    pub player_name: String,
    pub score: i64,
}

#[derive(Debug, Serialize)]
pub struct SubmitScoreResponse {
    pub entry: RankingEntry,
    pub is_new_record: bool,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub game_key: String,
    /// 1-based position of the caller's best score, -1 when the caller has
    /// never played this game.
    pub rank: i64,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub n: Option<i64>,
}

/// A candidate score beats the board only by strictly exceeding the current
/// top; matching it is not a new record. An empty board is always beaten.
fn beats_board(current_top: Option<i64>, score: i64) -> bool {
    match current_top {
        None => true,
        Some(top) => score > top,
    }
}

/// 1-based position of the player's first entry in the descending order.
/// Entries are pre-sorted best-first, so the first hit is the player's best.
fn position_of(ordered_players: &[Uuid], player: Uuid) -> Option<i64> {
    ordered_players
        .iter()
        .position(|p| *p == player)
        .map(|i| i as i64 + 1)
}

/// POST /rankings/:game — append-only: every submission inserts a row, a
/// player's history is never overwritten.
pub async fn submit_score(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(game_key): Path<String>,
    Json(req): Json<SubmitScoreRequest>,
) -> AppResult<Json<ApiResponse<SubmitScoreResponse>>> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    if req.score < 0 {
        return Err(AppError::new(ErrorCode::InvalidScore, "score must be non-negative"));
    }

    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    // Lock the current top row while inserting so concurrent submissions
    // agree on the record they have to beat.
    let (entry, is_new_record) = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            let current_top: Option<i64> = ranking_entries::table
                .filter(ranking_entries::game_key.eq(&game_key))
                .order(ranking_entries::score.desc())
                .select(ranking_entries::score)
                .for_update()
                .first(conn)
                .optional()?;

            let is_new_record = beats_board(current_top, req.score);

            let entry: RankingEntry = diesel::insert_into(ranking_entries::table)
                .values(&NewRankingEntry {
                    game_key: game_key.clone(),
                    player_id: user.id,
                    player_name: req.player_name.clone(),
                    score: req.score,
                })
                .get_result(conn)?;

            Ok((entry, is_new_record))
        })
        .map_err(|e| AppError::internal(format!("score transaction failed: {e}")))?;

    tracing::debug!(
        game_key = %game_key,
        player_id = %user.id,
        score = entry.score,
        is_new_record,
        "score recorded"
    );

    if is_new_record {
        publisher::publish_record_set(&state.rabbitmq, &entry).await;
    }

    Ok(Json(ApiResponse::ok(SubmitScoreResponse { entry, is_new_record })))
}

/// GET /rankings/:game/top?n= — best-first, earlier entry wins a tie.
pub async fn top_scores(
    State(state): State<Arc<AppState>>,
    Path(game_key): Path<String>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<ApiResponse<Vec<RankingEntry>>>> {
    let n = params
        .n
        .unwrap_or(state.config.default_top_n)
        .clamp(1, state.config.max_top_n);

    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let entries: Vec<RankingEntry> = ranking_entries::table
        .filter(ranking_entries::game_key.eq(&game_key))
        .order((ranking_entries::score.desc(), ranking_entries::created_at.asc()))
        .limit(n)
        .load(&mut conn)
        .map_err(|e| AppError::internal(format!("db error: {e}")))?;

    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /rankings/:game/rank — where the caller's best score sits on the full
/// board.
pub async fn my_rank(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(game_key): Path<String>,
) -> AppResult<Json<ApiResponse<RankResponse>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let ordered: Vec<Uuid> = ranking_entries::table
        .filter(ranking_entries::game_key.eq(&game_key))
        .order((ranking_entries::score.desc(), ranking_entries::created_at.asc()))
        .select(ranking_entries::player_id)
        .load(&mut conn)
        .map_err(|e| AppError::internal(format!("db error: {e}")))?;

    let rank = position_of(&ordered, user.id).unwrap_or(-1);

    Ok(Json(ApiResponse::ok(RankResponse { game_key, rank })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_makes_any_score_a_record() {
        assert!(beats_board(None, 0));
        assert!(beats_board(None, 100));
    }

    #[test]
    fn record_requires_strictly_greater() {
        assert!(beats_board(Some(85), 100));
        assert!(!beats_board(Some(100), 100));
        assert!(!beats_board(Some(100), 85));
    }

    #[test]
    fn rank_is_one_based_over_the_descending_order() {
        let ana = Uuid::new_v4();
        let leo = Uuid::new_v4();
        let mia = Uuid::new_v4();
        // Scores 100, 85, 72, 50 descending; leo appears twice, best first.
        let ordered = vec![ana, leo, mia, leo];
        assert_eq!(position_of(&ordered, ana), Some(1));
        assert_eq!(position_of(&ordered, leo), Some(2));
        assert_eq!(position_of(&ordered, mia), Some(3));
    }

    #[test]
    fn missing_player_has_no_rank() {
        let ordered = vec![Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(position_of(&ordered, Uuid::new_v4()), None);
        assert_eq!(position_of(&[], Uuid::new_v4()), None);
    }
}
