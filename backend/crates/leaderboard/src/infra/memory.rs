//! In-Memory Repository Implementation
//!
//! Enforces the same constraints as the PostgreSQL repository (capacity cap,
//! one team per user, one submission per team and level, unique level name
//! and answer digest). Backs the test suite and any deployment that does not
//! need durability; the routers accept it through the same repository traits
//! as the PostgreSQL implementation.

use crate::domain::entities::{GameServer, Level, Submission, Team, TeamMember};
use crate::domain::repository::{
    LevelRepository, ServerRepository, SubmissionRepository, TeamRepository,
};
use crate::domain::value_objects::MAX_MEMBERS_PER_TEAM;
use crate::error::{LeaderboardError, LeaderboardResult};
use kernel::id::{TeamId, UserId};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    teams: Vec<Team>,
    members: Vec<TeamMember>,
    levels: Vec<Level>,
    submissions: Vec<Submission>,
    servers: Vec<GameServer>,
}

/// In-memory repository
#[derive(Clone, Default)]
pub struct MemoryLeaderboardRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLeaderboardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // Lock poisoning only happens after a panic in another test thread;
        // propagating the panic is the right call there.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TeamRepository for MemoryLeaderboardRepository {
    async fn create(&self, team: &Team) -> LeaderboardResult<()> {
        self.lock().teams.push(team.clone());
        Ok(())
    }

    async fn find_by_id(&self, team_id: TeamId) -> LeaderboardResult<Option<Team>> {
        let state = self.lock();
        Ok(state.teams.iter().find(|t| t.id == team_id).cloned())
    }

    async fn find_by_member(&self, user_id: UserId) -> LeaderboardResult<Option<Team>> {
        let state = self.lock();
        let Some(member) = state.members.iter().find(|m| m.user_id == user_id) else {
            return Ok(None);
        };
        Ok(state.teams.iter().find(|t| t.id == member.team_id).cloned())
    }

    async fn member_count(&self, team_id: TeamId) -> LeaderboardResult<i64> {
        let state = self.lock();
        Ok(state.members.iter().filter(|m| m.team_id == team_id).count() as i64)
    }

    async fn add_member(&self, team: &Team, member: &TeamMember) -> LeaderboardResult<()> {
        let mut state = self.lock();

        if !state.teams.iter().any(|t| t.id == team.id) {
            return Err(LeaderboardError::TeamNotFound);
        }

        // One team per user, system-wide
        if state.members.iter().any(|m| m.user_id == member.user_id) {
            return Err(LeaderboardError::AlreadyOnTeam);
        }

        let count = state
            .members
            .iter()
            .filter(|m| m.team_id == team.id)
            .count() as i64;
        if count >= MAX_MEMBERS_PER_TEAM {
            return Err(LeaderboardError::TeamFull(team.name.as_str().to_string()));
        }

        state.members.push(member.clone());
        Ok(())
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> LeaderboardResult<()> {
        let mut state = self.lock();

        state
            .members
            .retain(|m| !(m.team_id == team_id && m.user_id == user_id));

        let empty = !state.members.iter().any(|m| m.team_id == team_id);
        if empty {
            // Cascade: the team and its submission history go together
            state.teams.retain(|t| t.id != team_id);
            state.submissions.retain(|s| s.team_id != team_id);
        }

        Ok(())
    }
}

impl LevelRepository for MemoryLeaderboardRepository {
    async fn create(&self, level: &Level) -> LeaderboardResult<()> {
        let mut state = self.lock();

        if state.levels.iter().any(|l| l.name == level.name) {
            return Err(LeaderboardError::DuplicateLevel(format!(
                "name '{}' already used",
                level.name
            )));
        }
        if state
            .levels
            .iter()
            .any(|l| l.answer_digest == level.answer_digest)
        {
            return Err(LeaderboardError::DuplicateLevel(
                "answer already used by another level".to_string(),
            ));
        }

        state.levels.push(level.clone());
        Ok(())
    }

    async fn count(&self) -> LeaderboardResult<i64> {
        Ok(self.lock().levels.len() as i64)
    }

    async fn at(&self, index: i64) -> LeaderboardResult<Option<Level>> {
        if index < 0 {
            return Ok(None);
        }
        let state = self.lock();
        Ok(state.levels.get(index as usize).cloned())
    }
}

impl SubmissionRepository for MemoryLeaderboardRepository {
    async fn record(&self, submission: &Submission) -> LeaderboardResult<bool> {
        let mut state = self.lock();

        let already = state
            .submissions
            .iter()
            .any(|s| s.team_id == submission.team_id && s.level_id == submission.level_id);
        if already {
            return Ok(false);
        }

        state.submissions.push(submission.clone());
        Ok(true)
    }

    async fn count_for_team(&self, team_id: TeamId) -> LeaderboardResult<i64> {
        let state = self.lock();
        Ok(state
            .submissions
            .iter()
            .filter(|s| s.team_id == team_id)
            .count() as i64)
    }
}

impl ServerRepository for MemoryLeaderboardRepository {
    async fn register(&self, server: &GameServer) -> LeaderboardResult<()> {
        self.lock().servers.push(server.clone());
        Ok(())
    }

    async fn list(&self) -> LeaderboardResult<Vec<GameServer>> {
        Ok(self.lock().servers.clone())
    }
}
