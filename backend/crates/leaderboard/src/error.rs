//! Leaderboard Error Types
//!
//! This module provides leaderboard-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use crate::domain::value_objects::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Leaderboard-specific result type alias
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// Leaderboard-specific error variants
///
/// These are domain-specific errors that map to appropriate HTTP status codes
/// and can be converted to `AppError` for unified error handling.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// User-correctable input problem (empty name, empty attempt, ...)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Team already holds the maximum number of members
    #[error("Team '{0}' is not accepting members")]
    TeamFull(String),

    /// The user already belongs to a team (global one-team-per-user constraint)
    #[error("User already belongs to a team")]
    AlreadyOnTeam,

    /// Level name or answer digest collides with an existing level
    #[error("Duplicate level: {0}")]
    DuplicateLevel(String),

    /// Referenced team does not exist
    #[error("Team not found")]
    TeamNotFound,

    /// Admin token missing or wrong
    #[error("Admin token required")]
    AdminRequired,

    /// `submit_attempt` invoked while the team cannot submit - a contract
    /// violation by the caller, not a user-facing condition
    #[error("Illegal state: team cannot submit solutions")]
    CannotSubmit,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LeaderboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LeaderboardError::Validation(_) => StatusCode::BAD_REQUEST,
            LeaderboardError::TeamFull(_)
            | LeaderboardError::AlreadyOnTeam
            | LeaderboardError::DuplicateLevel(_) => StatusCode::CONFLICT,
            LeaderboardError::TeamNotFound => StatusCode::NOT_FOUND,
            LeaderboardError::AdminRequired => StatusCode::FORBIDDEN,
            LeaderboardError::CannotSubmit | LeaderboardError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeaderboardError::Validation(_) => ErrorKind::BadRequest,
            LeaderboardError::TeamFull(_)
            | LeaderboardError::AlreadyOnTeam
            | LeaderboardError::DuplicateLevel(_) => ErrorKind::Conflict,
            LeaderboardError::TeamNotFound => ErrorKind::NotFound,
            LeaderboardError::AdminRequired => ErrorKind::Forbidden,
            LeaderboardError::CannotSubmit | LeaderboardError::Database(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            LeaderboardError::Database(e) => {
                tracing::error!(error = %e, "Leaderboard database error");
            }
            LeaderboardError::CannotSubmit => {
                // A correctly guarding caller never reaches this
                tracing::error!("Illegal-state submission attempt");
            }
            LeaderboardError::TeamFull(team) => {
                tracing::warn!(team = %team, "Join rejected, team full");
            }
            LeaderboardError::AlreadyOnTeam => {
                tracing::warn!("Join rejected, user already on a team");
            }
            _ => {
                tracing::debug!(error = %self, "Leaderboard error");
            }
        }
    }
}

impl From<LeaderboardError> for AppError {
    fn from(err: LeaderboardError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for LeaderboardError {
    fn into_response(self) -> Response {
        self.log();
        // Delegate body shape to the unified error type (problem+json)
        AppError::from(self).into_response()
    }
}
