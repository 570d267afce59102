//! API DTOs (Data Transfer Objects)

use crate::application::progress::TeamProgress;
use crate::domain::entities::{GameServer, Level};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team as seen by its members
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub team_id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub accepting_members: bool,
    pub next_level_index: i64,
    pub total_levels: i64,
    pub completed: bool,
}

impl TeamDto {
    pub fn from_progress(progress: &TeamProgress) -> Self {
        Self {
            team_id: progress.team.id.into_uuid(),
            name: progress.team.name.as_str().to_string(),
            member_count: progress.member_count,
            accepting_members: progress.is_accepting_members(),
            next_level_index: progress.next_level_index(),
            total_levels: progress.total_levels,
            completed: progress.completed(),
        }
    }
}

/// Response for GET /api/team (team is null when the user has no team)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatusResponse {
    pub team: Option<TeamDto>,
}

/// Request for POST /api/team
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Request for POST /api/team/join
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamRequest {
    pub team_id: Uuid,
}

/// Response for GET /api/submissions
///
/// `hasTeam == false` means the client should send the user to the team page
/// first; `completed == true` with no next level means the flag is captured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatusResponse {
    pub has_team: bool,
    pub can_submit: bool,
    pub completed: bool,
    pub next_level_index: Option<i64>,
    pub next_level_name: Option<String>,
    pub total_levels: i64,
}

impl SubmissionStatusResponse {
    pub fn no_team() -> Self {
        Self {
            has_team: false,
            can_submit: false,
            completed: false,
            next_level_index: None,
            next_level_name: None,
            total_levels: 0,
        }
    }

    pub fn from_progress(progress: &TeamProgress) -> Self {
        Self {
            has_team: true,
            can_submit: progress.can_submit(),
            completed: progress.completed(),
            next_level_index: progress
                .next_level
                .as_ref()
                .map(|_| progress.next_level_index()),
            next_level_name: progress
                .next_level
                .as_ref()
                .map(|l| l.name.as_str().to_string()),
            total_levels: progress.total_levels,
        }
    }
}

/// Request for POST /api/submissions
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub answer_attempt: String,
}

/// Response for POST /api/submissions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub passed: bool,
    pub completed: bool,
    pub next_level_index: i64,
}

/// Request for POST /api/levels (admin)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLevelRequest {
    pub name: String,
    pub answer: String,
}

/// Response for POST /api/levels - never exposes the answer digest
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDto {
    pub level_id: Uuid,
    pub name: String,
}

impl From<&Level> for LevelDto {
    fn from(level: &Level) -> Self {
        Self {
            level_id: level.id.into_uuid(),
            name: level.name.as_str().to_string(),
        }
    }
}

/// Request for POST /api/servers (admin)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterServerRequest {
    pub ip_address: String,
}

/// A registered game server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDto {
    pub server_id: Uuid,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&GameServer> for ServerDto {
    fn from(server: &GameServer) -> Self {
        Self {
            server_id: server.id.into_uuid(),
            ip_address: server.ip_address.to_string(),
            created_at: server.created_at,
            updated_at: server.updated_at,
        }
    }
}
