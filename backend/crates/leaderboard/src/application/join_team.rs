//! Join Team Use Case

use crate::domain::entities::{Team, TeamMember};
use crate::domain::repository::TeamRepository;
use crate::error::{LeaderboardError, LeaderboardResult};
use kernel::id::{TeamId, UserId};
use std::sync::Arc;

/// Input DTO for join team
#[derive(Debug, Clone)]
pub struct JoinTeamInput {
    pub team_id: TeamId,
}

/// Join Team Use Case
///
/// The capacity check and the membership insert happen inside one atomic
/// repository operation; two concurrent joins at the boundary cannot both
/// pass. A full team rejects the join with an error naming the team.
pub struct JoinTeamUseCase<T>
where
    T: TeamRepository,
{
    team_repo: Arc<T>,
}

impl<T> JoinTeamUseCase<T>
where
    T: TeamRepository,
{
    pub fn new(team_repo: Arc<T>) -> Self {
        Self { team_repo }
    }

    pub async fn execute(&self, input: JoinTeamInput, user_id: UserId) -> LeaderboardResult<Team> {
        let team = self
            .team_repo
            .find_by_id(input.team_id)
            .await?
            .ok_or(LeaderboardError::TeamNotFound)?;

        let member = TeamMember::new(team.id, user_id);
        self.team_repo.add_member(&team, &member).await?;

        tracing::info!(
            team_id = %team.id,
            user_id = %user_id,
            "Member joined team"
        );

        Ok(team)
    }
}
