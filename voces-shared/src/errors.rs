use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Directory errors
/// - E2xxx: Suggestion errors
/// - E3xxx: Notification errors
/// - E4xxx: Ranking errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    ServiceUnavailable,
    BadRequest,
    TokenExpired,
    TokenInvalid,

    // Directory (E1xxx)
    UserNotFound,
    EmailAlreadyExists,

    // Suggestion (E2xxx)
    SuggestionNotFound,
    SuggestionRejected,
    NotSuggestionAuthor,
    SuggestionLocked,
    InvalidSuggestionStatus,

    // Notification (E3xxx)
    NotificationNotFound,

    // Ranking (E4xxx)
    InvalidScore,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::ServiceUnavailable => "E0006",
            Self::BadRequest => "E0007",
            Self::TokenExpired => "E0008",
            Self::TokenInvalid => "E0009",

            // Directory
            Self::UserNotFound => "E1001",
            Self::EmailAlreadyExists => "E1002",

            // Suggestion
            Self::SuggestionNotFound => "E2001",
            Self::SuggestionRejected => "E2002",
            Self::NotSuggestionAuthor => "E2003",
            Self::SuggestionLocked => "E2004",
            Self::InvalidSuggestionStatus => "E2005",

            // Notification
            Self::NotificationNotFound => "E3001",

            // Ranking
            Self::InvalidScore => "E4001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidSuggestionStatus
            | Self::InvalidScore => StatusCode::BAD_REQUEST,
            Self::SuggestionRejected => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound | Self::UserNotFound | Self::SuggestionNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::NotSuggestionAuthor => StatusCode::FORBIDDEN,
            Self::EmailAlreadyExists | Self::SuggestionLocked => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let all = [
            ErrorCode::InternalError,
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::ServiceUnavailable,
            ErrorCode::BadRequest,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::UserNotFound,
            ErrorCode::EmailAlreadyExists,
            ErrorCode::SuggestionNotFound,
            ErrorCode::SuggestionRejected,
            ErrorCode::NotSuggestionAuthor,
            ErrorCode::SuggestionLocked,
            ErrorCode::InvalidSuggestionStatus,
            ErrorCode::NotificationNotFound,
            ErrorCode::InvalidScore,
        ];
        let mut codes: Vec<&str> = all.iter().map(|c| c.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn moderation_rejection_maps_to_422() {
        assert_eq!(
            ErrorCode::SuggestionRejected.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn ownership_violation_maps_to_403() {
        assert_eq!(ErrorCode::NotSuggestionAuthor.status_code(), StatusCode::FORBIDDEN);
    }
}
