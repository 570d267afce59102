//! Leaderboard Backend Module
//!
//! Capture-the-flag leaderboard: users join teams, teams progress through an
//! ordered sequence of levels, and a level unlocks only after the previous
//! one's answer has been submitted correctly.
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases
//! - `infra/` - Repository implementations (PostgreSQL, in-memory)
//! - `presentation/` - HTTP handlers
//!
//! ## Consistency Model
//! - Progression is always derived from the submission ledger, never cached
//! - Membership capacity and one-team-per-user are enforced at the storage
//!   boundary (guarded insert + unique constraint)
//! - Rejected answer attempts leave no trace

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LeaderboardConfig;
pub use error::{LeaderboardError, LeaderboardResult};
pub use infra::memory::MemoryLeaderboardRepository;
pub use infra::postgres::PgLeaderboardRepository;
pub use presentation::router::leaderboard_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
