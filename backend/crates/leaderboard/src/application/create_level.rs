//! Create Level Use Case
//!
//! Levels form the globally shared challenge sequence. They are created
//! during event setup and never updated or deleted afterwards; their position
//! in the sequence is their creation order.

use crate::domain::entities::Level;
use crate::domain::repository::LevelRepository;
use crate::domain::value_objects::{AnswerAttempt, LevelName};
use crate::error::LeaderboardResult;
use std::sync::Arc;

/// Input DTO for create level
#[derive(Debug, Clone)]
pub struct CreateLevelInput {
    pub name: String,
    /// Plaintext correct answer; only its digest is stored
    pub answer: String,
}

/// Create Level Use Case
pub struct CreateLevelUseCase<L>
where
    L: LevelRepository,
{
    level_repo: Arc<L>,
}

impl<L> CreateLevelUseCase<L>
where
    L: LevelRepository,
{
    pub fn new(level_repo: Arc<L>) -> Self {
        Self { level_repo }
    }

    pub async fn execute(&self, input: CreateLevelInput) -> LeaderboardResult<Level> {
        let name = LevelName::new(input.name)?;
        // Validate the answer the same way attempts are validated, so an
        // unsolvable level (empty answer) cannot be created.
        let answer = AnswerAttempt::new(input.answer)?;

        let level = Level::new(name, answer.as_str());
        self.level_repo.create(&level).await?;

        tracing::info!(
            level_id = %level.id,
            level_name = %level.name,
            "Level created"
        );

        Ok(level)
    }
}
