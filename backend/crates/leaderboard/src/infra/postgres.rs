//! PostgreSQL Repository Implementations
//!
//! All consistency rules live at this boundary: the capacity cap is a guarded
//! insert, one-team-per-user and one-submission-per-level are unique
//! constraints, and emptied teams are deleted inside the same transaction
//! that removed their last member.

use crate::domain::entities::{GameServer, Level, Submission, Team, TeamMember};
use crate::domain::repository::{
    LevelRepository, ServerRepository, SubmissionRepository, TeamRepository,
};
use crate::domain::value_objects::{LevelName, MAX_MEMBERS_PER_TEAM, TeamName};
use crate::error::{LeaderboardError, LeaderboardResult};
use chrono::{DateTime, Utc};
use kernel::id::{LevelId, ServerId, TeamId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgLeaderboardRepository {
    pool: PgPool,
}

impl PgLeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The violated unique constraint's name, when `err` is a 23505
fn unique_constraint(err: &sqlx::Error) -> Option<&str> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return db_err.constraint();
        }
    }
    None
}

impl TeamRepository for PgLeaderboardRepository {
    async fn create(&self, team: &Team) -> LeaderboardResult<()> {
        sqlx::query(
            r#"
            INSERT INTO teams (team_id, team_name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(*team.id.as_uuid())
        .bind(team.name.as_str())
        .bind(team.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(team_id = %team.id, "Team row inserted");

        Ok(())
    }

    async fn find_by_id(&self, team_id: TeamId) -> LeaderboardResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT team_id, team_name, created_at
            FROM teams
            WHERE team_id = $1
            "#,
        )
        .bind(*team_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeamRow::into_team).transpose()
    }

    async fn find_by_member(&self, user_id: UserId) -> LeaderboardResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT t.team_id, t.team_name, t.created_at
            FROM teams t
            JOIN team_members m ON m.team_id = t.team_id
            WHERE m.user_id = $1
            "#,
        )
        .bind(*user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeamRow::into_team).transpose()
    }

    async fn member_count(&self, team_id: TeamId) -> LeaderboardResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM team_members WHERE team_id = $1",
        )
        .bind(*team_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn add_member(&self, team: &Team, member: &TeamMember) -> LeaderboardResult<()> {
        let mut tx = self.pool.begin().await?;

        // Joins on one team are serialized through the team row lock; under
        // read committed, two unserialized guarded inserts could both observe
        // the pre-insert count and admit a fifth member.
        let locked = sqlx::query("SELECT team_id FROM teams WHERE team_id = $1 FOR UPDATE")
            .bind(*team.id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(LeaderboardError::TeamNotFound);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_member_id, team_id, user_id, created_at)
            SELECT $1, $2, $3, $4
            WHERE (SELECT COUNT(*) FROM team_members WHERE team_id = $2) < $5
            "#,
        )
        .bind(*member.id.as_uuid())
        .bind(*team.id.as_uuid())
        .bind(*member.user_id.as_uuid())
        .bind(member.created_at)
        .bind(MAX_MEMBERS_PER_TEAM)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if unique_constraint(&e) == Some("uq_team_members_user") {
                LeaderboardError::AlreadyOnTeam
            } else {
                LeaderboardError::Database(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(LeaderboardError::TeamFull(team.name.as_str().to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            team_id = %team.id,
            user_id = %member.user_id,
            "Membership row inserted"
        );

        Ok(())
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> LeaderboardResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(*team_id.as_uuid())
            .bind(*user_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let remaining =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(*team_id.as_uuid())
                .fetch_one(&mut *tx)
                .await?;

        if remaining == 0 {
            // Cascades to the submission history
            sqlx::query("DELETE FROM teams WHERE team_id = $1")
                .bind(*team_id.as_uuid())
                .execute(&mut *tx)
                .await?;

            tracing::info!(team_id = %team_id, "Team deleted, last member left");
        }

        tx.commit().await?;

        Ok(())
    }
}

impl LevelRepository for PgLeaderboardRepository {
    async fn create(&self, level: &Level) -> LeaderboardResult<()> {
        sqlx::query(
            r#"
            INSERT INTO levels (level_id, level_name, answer_digest, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(*level.id.as_uuid())
        .bind(level.name.as_str())
        .bind(&level.answer_digest)
        .bind(level.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_constraint(&e) {
            Some("uq_levels_name") => {
                LeaderboardError::DuplicateLevel(format!("name '{}' already used", level.name))
            }
            Some("uq_levels_answer_digest") => {
                LeaderboardError::DuplicateLevel("answer already used by another level".to_string())
            }
            _ => LeaderboardError::Database(e),
        })?;

        tracing::info!(level_id = %level.id, level_name = %level.name, "Level row inserted");

        Ok(())
    }

    async fn count(&self) -> LeaderboardResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM levels")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn at(&self, index: i64) -> LeaderboardResult<Option<Level>> {
        if index < 0 {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, LevelRow>(
            r#"
            SELECT level_id, level_name, answer_digest, created_at
            FROM levels
            ORDER BY level_seq
            OFFSET $1
            LIMIT 1
            "#,
        )
        .bind(index)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LevelRow::into_level).transpose()
    }
}

impl SubmissionRepository for PgLeaderboardRepository {
    async fn record(&self, submission: &Submission) -> LeaderboardResult<bool> {
        // The (team, level) unique constraint is the backstop against two
        // teammates recording the same level concurrently; the loser is a
        // clean no-op, not an error.
        let result = sqlx::query(
            r#"
            INSERT INTO submissions (submission_id, team_id, level_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (team_id, level_id) DO NOTHING
            "#,
        )
        .bind(*submission.id.as_uuid())
        .bind(*submission.team_id.as_uuid())
        .bind(*submission.level_id.as_uuid())
        .bind(submission.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_for_team(&self, team_id: TeamId) -> LeaderboardResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE team_id = $1")
                .bind(*team_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

impl ServerRepository for PgLeaderboardRepository {
    async fn register(&self, server: &GameServer) -> LeaderboardResult<()> {
        sqlx::query(
            r#"
            INSERT INTO servers (server_id, ip_address, created_at, updated_at)
            VALUES ($1, $2::inet, $3, $4)
            "#,
        )
        .bind(*server.id.as_uuid())
        .bind(server.ip_address.to_string())
        .bind(server.created_at)
        .bind(server.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> LeaderboardResult<Vec<GameServer>> {
        let rows = sqlx::query_as::<_, ServerRow>(
            r#"
            SELECT server_id, ip_address::TEXT AS ip_address, created_at, updated_at
            FROM servers
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ServerRow::into_server).collect()
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TeamRow {
    team_id: Uuid,
    team_name: String,
    created_at: DateTime<Utc>,
}

impl TeamRow {
    fn into_team(self) -> LeaderboardResult<Team> {
        Ok(Team {
            id: TeamId::from_uuid(self.team_id),
            name: TeamName::new(self.team_name)?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LevelRow {
    level_id: Uuid,
    level_name: String,
    answer_digest: String,
    created_at: DateTime<Utc>,
}

impl LevelRow {
    fn into_level(self) -> LeaderboardResult<Level> {
        Ok(Level {
            id: LevelId::from_uuid(self.level_id),
            name: LevelName::new(self.level_name)?,
            answer_digest: self.answer_digest,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ServerRow {
    server_id: Uuid,
    ip_address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServerRow {
    fn into_server(self) -> LeaderboardResult<GameServer> {
        let ip = self
            .ip_address
            .parse()
            .map_err(|_| crate::domain::value_objects::ValidationError::InvalidIpAddress)?;

        Ok(GameServer {
            id: ServerId::from_uuid(self.server_id),
            ip_address: ip,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
