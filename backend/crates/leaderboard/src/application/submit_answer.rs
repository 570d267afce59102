//! Submit Answer Use Case

use crate::application::progress::TeamProgress;
use crate::domain::entities::Submission;
use crate::domain::repository::SubmissionRepository;
use crate::domain::value_objects::AnswerAttempt;
use crate::error::{LeaderboardError, LeaderboardResult};
use std::sync::Arc;

/// Input DTO for submit answer
#[derive(Debug, Clone)]
pub struct SubmitAnswerInput {
    pub answer_attempt: String,
}

/// Outcome of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitAnswerOutput {
    pub passed: bool,
    /// Index of the next unsolved level after this attempt
    pub next_level_index: i64,
    pub completed: bool,
}

/// Submit Answer Use Case
///
/// Callers must hold a fresh [`TeamProgress`] snapshot; invoking this while
/// the team cannot submit is a contract violation and surfaces as an
/// illegal-state error. Incorrect attempts leave no persistent trace.
pub struct SubmitAnswerUseCase<S>
where
    S: SubmissionRepository,
{
    submission_repo: Arc<S>,
}

impl<S> SubmitAnswerUseCase<S>
where
    S: SubmissionRepository,
{
    pub fn new(submission_repo: Arc<S>) -> Self {
        Self { submission_repo }
    }

    pub async fn execute(
        &self,
        progress: &TeamProgress,
        input: SubmitAnswerInput,
    ) -> LeaderboardResult<SubmitAnswerOutput> {
        let attempt = AnswerAttempt::new(input.answer_attempt)?;

        if !progress.can_submit() {
            return Err(LeaderboardError::CannotSubmit);
        }
        let Some(level) = progress.next_level.as_ref() else {
            return Err(LeaderboardError::CannotSubmit);
        };

        if !level.is_correct(&attempt) {
            tracing::info!(
                team_id = %progress.team.id,
                level = %level.name,
                "Incorrect answer attempt"
            );
            return Ok(SubmitAnswerOutput {
                passed: false,
                next_level_index: progress.next_level_index(),
                completed: false,
            });
        }

        let submission = Submission::new(progress.team.id, level.id);
        let inserted = self.submission_repo.record(&submission).await?;
        if !inserted {
            // A teammate recorded the same level concurrently; the team has
            // passed either way.
            tracing::info!(
                team_id = %progress.team.id,
                level = %level.name,
                "Level already recorded by a teammate"
            );
        }

        let next_level_index = progress.next_level_index() + 1;
        let completed = next_level_index >= progress.total_levels;

        tracing::info!(
            team_id = %progress.team.id,
            level = %level.name,
            next_level_index,
            completed,
            "Level solved"
        );

        Ok(SubmitAnswerOutput {
            passed: true,
            next_level_index,
            completed,
        })
    }
}
