//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//! All multi-step operations (guarded member insert, remove-then-delete) are
//! single methods here so implementations can make them atomic.

use crate::domain::entities::{GameServer, Level, Submission, Team, TeamMember};
use crate::error::LeaderboardResult;
use kernel::id::{TeamId, UserId};

/// Team repository trait - team aggregate plus the team directory
#[trait_variant::make(TeamRepository: Send)]
pub trait LocalTeamRepository {
    /// Insert a new team (no members yet)
    async fn create(&self, team: &Team) -> LeaderboardResult<()>;

    /// Find a team by its ID
    async fn find_by_id(&self, team_id: TeamId) -> LeaderboardResult<Option<Team>>;

    /// Team directory: the single team a user belongs to, if any
    async fn find_by_member(&self, user_id: UserId) -> LeaderboardResult<Option<Team>>;

    /// Current member count for a team
    async fn member_count(&self, team_id: TeamId) -> LeaderboardResult<i64>;

    /// Insert a membership, atomically guarded by the capacity cap
    ///
    /// Fails with a capacity error naming `team` when the team is full, and
    /// with a uniqueness error when the user already belongs to any team.
    async fn add_member(&self, team: &Team, member: &TeamMember) -> LeaderboardResult<()>;

    /// Delete the membership if present (absent is a no-op); in the same
    /// transaction, delete the team when this leaves it empty.
    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> LeaderboardResult<()>;
}

/// Level catalog trait - ordered, immutable-after-setup
#[trait_variant::make(LevelRepository: Send)]
pub trait LocalLevelRepository {
    /// Insert a new level (unique name, unique answer digest)
    async fn create(&self, level: &Level) -> LeaderboardResult<()>;

    /// Total levels in existence
    async fn count(&self) -> LeaderboardResult<i64>;

    /// The level at zero-based position `index` in creation order
    async fn at(&self, index: i64) -> LeaderboardResult<Option<Level>>;
}

/// Submission ledger trait - append-only, no update, no delete
#[trait_variant::make(SubmissionRepository: Send)]
pub trait LocalSubmissionRepository {
    /// Record a solved level; returns `false` when the (team, level) pair is
    /// already present (a teammate got there first)
    async fn record(&self, submission: &Submission) -> LeaderboardResult<bool>;

    /// How many levels this team has solved
    async fn count_for_team(&self, team_id: TeamId) -> LeaderboardResult<i64>;
}

/// Game server registry trait
#[trait_variant::make(ServerRepository: Send)]
pub trait LocalServerRepository {
    /// Register a game server
    async fn register(&self, server: &GameServer) -> LeaderboardResult<()>;

    /// All registered servers in registration order
    async fn list(&self) -> LeaderboardResult<Vec<GameServer>>;
}
