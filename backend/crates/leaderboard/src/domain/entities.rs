//! Domain Entities
//!
//! Core business entities for the leaderboard domain.

use crate::domain::services::encode_answer;
use crate::domain::value_objects::{AnswerAttempt, LevelName, TeamName};
use chrono::{DateTime, Utc};
use kernel::id::{LevelId, ServerId, SubmissionId, TeamId, TeamMemberId, UserId};
use std::net::IpAddr;

/// Team entity - a group of users sharing one progression
///
/// Names are not unique; two teams may carry the same name.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub name: TeamName,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team
    pub fn new(name: TeamName) -> Self {
        Self {
            id: TeamId::new(),
            name,
            created_at: Utc::now(),
        }
    }
}

/// TeamMember entity - the join relation between a team and a user
///
/// A user appears in at most one membership system-wide.
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Create a new membership linking `team_id` and `user_id`
    pub fn new(team_id: TeamId, user_id: UserId) -> Self {
        Self {
            id: TeamMemberId::new(),
            team_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Level entity - one challenge in the fixed, globally shared sequence
///
/// Immutable once created. Only the digest of the correct answer is held,
/// never the plaintext.
#[derive(Debug, Clone)]
pub struct Level {
    pub id: LevelId,
    pub name: LevelName,
    pub answer_digest: String,
    pub created_at: DateTime<Utc>,
}

impl Level {
    /// Create a new level from a name and the plaintext correct answer
    pub fn new(name: LevelName, answer: &str) -> Self {
        Self {
            id: LevelId::new(),
            name,
            answer_digest: encode_answer(answer),
            created_at: Utc::now(),
        }
    }

    /// Check an attempt against the stored digest
    pub fn is_correct(&self, attempt: &AnswerAttempt) -> bool {
        encode_answer(attempt.as_str()) == self.answer_digest
    }
}

/// Submission entity - a persisted record of a team having solved a level
///
/// Only successful attempts are ever recorded; at most one per (team, level).
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub team_id: TeamId,
    pub level_id: LevelId,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(team_id: TeamId, level_id: LevelId) -> Self {
        Self {
            id: SubmissionId::new(),
            team_id,
            level_id,
            created_at: Utc::now(),
        }
    }
}

/// GameServer entity - a target machine players attack during the event
#[derive(Debug, Clone)]
pub struct GameServer {
    pub id: ServerId,
    pub ip_address: IpAddr,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameServer {
    pub fn new(ip_address: IpAddr) -> Self {
        let now = Utc::now();
        Self {
            id: ServerId::new(),
            ip_address,
            created_at: now,
            updated_at: now,
        }
    }
}
