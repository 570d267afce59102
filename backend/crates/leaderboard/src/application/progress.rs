//! Team Progress Use Case
//!
//! The read side of the team aggregate: membership count and level
//! progression, always recomputed from the submission ledger (never cached,
//! so it can never drift).

use crate::domain::entities::{Level, Team};
use crate::domain::repository::{LevelRepository, SubmissionRepository, TeamRepository};
use crate::domain::value_objects::MAX_MEMBERS_PER_TEAM;
use crate::error::LeaderboardResult;
use kernel::id::UserId;
use std::sync::Arc;

/// A consistent snapshot of one team's membership and progression
#[derive(Debug, Clone)]
pub struct TeamProgress {
    pub team: Team,
    pub member_count: i64,
    pub solved_levels: i64,
    pub total_levels: i64,
    pub next_level: Option<Level>,
}

impl TeamProgress {
    /// Zero-based index of the next unsolved level; equals the count of
    /// recorded submissions
    pub fn next_level_index(&self) -> i64 {
        self.solved_levels
    }

    pub fn is_empty(&self) -> bool {
        self.member_count == 0
    }

    pub fn is_accepting_members(&self) -> bool {
        self.member_count < MAX_MEMBERS_PER_TEAM
    }

    /// Terminal state: every level in existence has been solved
    pub fn completed(&self) -> bool {
        self.solved_levels >= self.total_levels
    }

    /// An empty team can never submit; neither can a team that has solved
    /// every existing level
    pub fn can_submit(&self) -> bool {
        !self.is_empty() && self.next_level.is_some()
    }
}

/// Team Progress Use Case
pub struct TeamProgressUseCase<T, L, S>
where
    T: TeamRepository,
    L: LevelRepository,
    S: SubmissionRepository,
{
    team_repo: Arc<T>,
    level_repo: Arc<L>,
    submission_repo: Arc<S>,
}

impl<T, L, S> TeamProgressUseCase<T, L, S>
where
    T: TeamRepository,
    L: LevelRepository,
    S: SubmissionRepository,
{
    pub fn new(team_repo: Arc<T>, level_repo: Arc<L>, submission_repo: Arc<S>) -> Self {
        Self {
            team_repo,
            level_repo,
            submission_repo,
        }
    }

    /// Progress of the team the user belongs to, if any
    pub async fn for_user(&self, user_id: UserId) -> LeaderboardResult<Option<TeamProgress>> {
        match self.team_repo.find_by_member(user_id).await? {
            Some(team) => Ok(Some(self.for_team(team).await?)),
            None => Ok(None),
        }
    }

    /// Progress snapshot for a known team
    pub async fn for_team(&self, team: Team) -> LeaderboardResult<TeamProgress> {
        let member_count = self.team_repo.member_count(team.id).await?;
        let solved_levels = self.submission_repo.count_for_team(team.id).await?;
        let total_levels = self.level_repo.count().await?;
        let next_level = self.level_repo.at(solved_levels).await?;

        Ok(TeamProgress {
            team,
            member_count,
            solved_levels,
            total_levels,
            next_level,
        })
    }
}
