use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use voces_shared::errors::{AppError, AppResult};
use voces_shared::middleware::AdminUser;
use voces_shared::types::ApiResponse;

use crate::models::SuggestionStatus;
use crate::routes::suggestions::ScopeParams;
use crate::schema::suggestions;
use crate::AppState;

#[derive(Debug, Serialize, PartialEq)]
pub struct ScopeStats {
    pub total: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    pub approval_rate: f64,
}

impl ScopeStats {
    /// Derived from the three status counts; there are no persisted counters.
    fn from_counts(approved: i64, rejected: i64, pending: i64) -> Self {
        let total = approved + rejected + pending;
        let approval_rate = if total == 0 {
            0.0
        } else {
            approved as f64 / total as f64
        };
        Self {
            total,
            approved,
            rejected,
            pending,
            approval_rate,
        }
    }
}

/// GET /suggestions/stats?grade=&group= — computed by scanning the scope.
pub async fn scope_stats(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Query(scope): Query<ScopeParams>,
) -> AppResult<Json<ApiResponse<ScopeStats>>> {
    let mut conn = state.db.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let mut count_for = |status: SuggestionStatus| -> AppResult<i64> {
        suggestions::table
            .filter(suggestions::grade.eq(&scope.grade))
            .filter(suggestions::group_name.eq(&scope.group_name))
            .filter(suggestions::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::internal(format!("db error: {e}")))
    };

    let approved = count_for(SuggestionStatus::Approved)?;
    let rejected = count_for(SuggestionStatus::Rejected)?;
    let pending = count_for(SuggestionStatus::Pending)?;

    Ok(Json(ApiResponse::ok(ScopeStats::from_counts(
        approved, rejected, pending,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_the_sum_of_the_three_statuses() {
        let stats = ScopeStats::from_counts(4, 2, 3);
        assert_eq!(stats.total, stats.approved + stats.rejected + stats.pending);
        assert_eq!(stats.total, 9);
    }

    #[test]
    fn approval_rate_over_total() {
        let stats = ScopeStats::from_counts(3, 1, 0);
        assert!((stats.approval_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_scope_has_zero_rate_not_nan() {
        let stats = ScopeStats::from_counts(0, 0, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.approval_rate, 0.0);
    }
}
