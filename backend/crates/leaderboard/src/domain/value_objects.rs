//! Domain Value Objects
//!
//! Immutable value types for the leaderboard domain.

use std::fmt;
use thiserror::Error;

/// Maximum number of members a team may ever hold
pub const MAX_MEMBERS_PER_TEAM: i64 = 4;

/// Maximum length of a team name (in characters)
pub const TEAM_NAME_MAX_LENGTH: usize = 80;

/// Maximum length of a level name (in characters)
pub const LEVEL_NAME_MAX_LENGTH: usize = 80;

/// Maximum length of an answer attempt (in characters)
pub const ANSWER_ATTEMPT_MAX_LENGTH: usize = 200;

/// Validation failures for user-supplied input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Team name must not be empty")]
    EmptyTeamName,
    #[error("Team name must be at most {TEAM_NAME_MAX_LENGTH} characters")]
    TeamNameTooLong,
    #[error("Level name must not be empty")]
    EmptyLevelName,
    #[error("Level name must be at most {LEVEL_NAME_MAX_LENGTH} characters")]
    LevelNameTooLong,
    #[error("Answer attempt must not be empty")]
    EmptyAnswerAttempt,
    #[error("Answer attempt must be at most {ANSWER_ATTEMPT_MAX_LENGTH} characters")]
    AnswerAttemptTooLong,
    #[error("Invalid IP address")]
    InvalidIpAddress,
}

/// Team name - non-empty, bounded, not unique (duplicates permitted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamName(String);

impl TeamName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTeamName);
        }
        if trimmed.chars().count() > TEAM_NAME_MAX_LENGTH {
            return Err(ValidationError::TeamNameTooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Level name - non-empty, bounded, globally unique (DB constraint)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelName(String);

impl LevelName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyLevelName);
        }
        if trimmed.chars().count() > LEVEL_NAME_MAX_LENGTH {
            return Err(ValidationError::LevelNameTooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One plaintext answer attempt - non-empty, bounded
///
/// Never persisted; only its digest is ever compared or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerAttempt(String);

impl AnswerAttempt {
    pub fn new(attempt: impl Into<String>) -> Result<Self, ValidationError> {
        let attempt = attempt.into();
        if attempt.is_empty() {
            return Err(ValidationError::EmptyAnswerAttempt);
        }
        if attempt.chars().count() > ANSWER_ATTEMPT_MAX_LENGTH {
            return Err(ValidationError::AnswerAttemptTooLong);
        }
        Ok(Self(attempt))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
