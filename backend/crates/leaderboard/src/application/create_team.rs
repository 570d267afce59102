//! Create Team Use Case

use crate::domain::entities::{Team, TeamMember};
use crate::domain::repository::TeamRepository;
use crate::domain::value_objects::TeamName;
use crate::error::{LeaderboardError, LeaderboardResult};
use kernel::id::UserId;
use std::sync::Arc;

/// Input DTO for create team
#[derive(Debug, Clone)]
pub struct CreateTeamInput {
    pub name: String,
}

/// Create Team Use Case
///
/// Inserts the team, then makes the acting user its first member. A user who
/// already belongs to a team is rejected before the team insert; the global
/// uniqueness constraint on the membership insert remains the hard backstop.
pub struct CreateTeamUseCase<T>
where
    T: TeamRepository,
{
    team_repo: Arc<T>,
}

impl<T> CreateTeamUseCase<T>
where
    T: TeamRepository,
{
    pub fn new(team_repo: Arc<T>) -> Self {
        Self { team_repo }
    }

    pub async fn execute(&self, input: CreateTeamInput, user_id: UserId) -> LeaderboardResult<Team> {
        let name = TeamName::new(input.name)?;

        // Checked before the team insert so a user already on a team does not
        // leave a memberless team behind; a racing join still hits the
        // membership uniqueness constraint below.
        if self.team_repo.find_by_member(user_id).await?.is_some() {
            return Err(LeaderboardError::AlreadyOnTeam);
        }

        let team = Team::new(name);

        self.team_repo.create(&team).await?;

        let founder = TeamMember::new(team.id, user_id);
        self.team_repo.add_member(&team, &founder).await?;

        tracing::info!(
            team_id = %team.id,
            team_name = %team.name,
            user_id = %user_id,
            "Team created"
        );

        Ok(team)
    }
}
