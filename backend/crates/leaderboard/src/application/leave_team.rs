//! Leave Team Use Case

use crate::domain::repository::TeamRepository;
use crate::error::LeaderboardResult;
use kernel::id::UserId;
use std::sync::Arc;

/// Leave Team Use Case
///
/// Removing the last member deletes the team itself (cascading its submission
/// history); no observer ever sees an emptied team persist. Leaving while not
/// on any team is a no-op, not an error.
pub struct LeaveTeamUseCase<T>
where
    T: TeamRepository,
{
    team_repo: Arc<T>,
}

impl<T> LeaveTeamUseCase<T>
where
    T: TeamRepository,
{
    pub fn new(team_repo: Arc<T>) -> Self {
        Self { team_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> LeaderboardResult<()> {
        let Some(team) = self.team_repo.find_by_member(user_id).await? else {
            tracing::debug!(user_id = %user_id, "Leave requested without membership");
            return Ok(());
        };

        self.team_repo.remove_member(team.id, user_id).await?;

        tracing::info!(
            team_id = %team.id,
            user_id = %user_id,
            "Member left team"
        );

        Ok(())
    }
}
