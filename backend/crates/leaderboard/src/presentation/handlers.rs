//! HTTP Handlers

use crate::application::config::LeaderboardConfig;
use crate::application::create_level::{CreateLevelInput, CreateLevelUseCase};
use crate::application::create_team::{CreateTeamInput, CreateTeamUseCase};
use crate::application::join_team::{JoinTeamInput, JoinTeamUseCase};
use crate::application::leave_team::LeaveTeamUseCase;
use crate::application::progress::TeamProgressUseCase;
use crate::application::servers::{ListServersUseCase, RegisterServerInput, RegisterServerUseCase};
use crate::application::submit_answer::{SubmitAnswerInput, SubmitAnswerUseCase};
use crate::domain::repository::{
    LevelRepository, ServerRepository, SubmissionRepository, TeamRepository,
};
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::presentation::dto::{
    CreateLevelRequest, CreateTeamRequest, JoinTeamRequest, LevelDto, RegisterServerRequest,
    ServerDto, SubmissionStatusResponse, SubmitAnswerRequest, SubmitAnswerResponse, TeamDto,
    TeamStatusResponse,
};
use crate::presentation::middleware::AuthenticatedUser;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use kernel::id::TeamId;
use std::sync::Arc;

/// Shared state for leaderboard handlers
#[derive(Clone)]
pub struct AppState<R>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<LeaderboardConfig>,
}

impl<R> AppState<R>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    fn progress(&self) -> TeamProgressUseCase<R, R, R> {
        TeamProgressUseCase::new(self.repo.clone(), self.repo.clone(), self.repo.clone())
    }
}

/// The admin surface requires a configured token; constant-time comparison
fn check_admin(config: &LeaderboardConfig, headers: &HeaderMap) -> LeaderboardResult<()> {
    let Some(expected) = config.admin_token.as_deref() else {
        return Err(LeaderboardError::AdminRequired);
    };
    let provided = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if platform::crypto::constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(LeaderboardError::AdminRequired)
    }
}

/// GET /api/team
pub async fn team_status<R>(
    State(state): State<AppState<R>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> LeaderboardResult<Json<TeamStatusResponse>>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let progress = state.progress().for_user(user_id).await?;

    Ok(Json(TeamStatusResponse {
        team: progress.as_ref().map(TeamDto::from_progress),
    }))
}

/// POST /api/team
pub async fn create_team<R>(
    State(state): State<AppState<R>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTeamRequest>,
) -> LeaderboardResult<impl IntoResponse>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = CreateTeamUseCase::new(state.repo.clone());
    let team = use_case
        .execute(CreateTeamInput { name: req.name }, user_id)
        .await?;

    let progress = state.progress().for_team(team).await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamStatusResponse {
            team: Some(TeamDto::from_progress(&progress)),
        }),
    ))
}

/// POST /api/team/join
pub async fn join_team<R>(
    State(state): State<AppState<R>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(req): Json<JoinTeamRequest>,
) -> LeaderboardResult<Json<TeamStatusResponse>>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = JoinTeamUseCase::new(state.repo.clone());
    let team = use_case
        .execute(
            JoinTeamInput {
                team_id: TeamId::from_uuid(req.team_id),
            },
            user_id,
        )
        .await?;

    let progress = state.progress().for_team(team).await?;

    Ok(Json(TeamStatusResponse {
        team: Some(TeamDto::from_progress(&progress)),
    }))
}

/// POST /api/team/leave
pub async fn leave_team<R>(
    State(state): State<AppState<R>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> LeaderboardResult<StatusCode>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = LeaveTeamUseCase::new(state.repo.clone());
    use_case.execute(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/submissions
pub async fn submission_status<R>(
    State(state): State<AppState<R>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> LeaderboardResult<Json<SubmissionStatusResponse>>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let response = match state.progress().for_user(user_id).await? {
        Some(progress) => SubmissionStatusResponse::from_progress(&progress),
        None => SubmissionStatusResponse::no_team(),
    };

    Ok(Json(response))
}

/// POST /api/submissions
pub async fn submit_answer<R>(
    State(state): State<AppState<R>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(req): Json<SubmitAnswerRequest>,
) -> LeaderboardResult<Json<SubmitAnswerResponse>>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let Some(progress) = state.progress().for_user(user_id).await? else {
        return Err(LeaderboardError::TeamNotFound);
    };

    // A team that has captured the flag gets a benign response, not an error;
    // the use case itself treats a bare !can_submit call as caller misuse.
    if !progress.can_submit() {
        return Ok(Json(SubmitAnswerResponse {
            passed: false,
            completed: progress.completed(),
            next_level_index: progress.next_level_index(),
        }));
    }

    let use_case = SubmitAnswerUseCase::new(state.repo.clone());
    let output = use_case
        .execute(
            &progress,
            SubmitAnswerInput {
                answer_attempt: req.answer_attempt,
            },
        )
        .await?;

    Ok(Json(SubmitAnswerResponse {
        passed: output.passed,
        completed: output.completed,
        next_level_index: output.next_level_index,
    }))
}

/// POST /api/levels (admin)
pub async fn create_level<R>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    Json(req): Json<CreateLevelRequest>,
) -> LeaderboardResult<impl IntoResponse>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    check_admin(&state.config, &headers)?;

    let use_case = CreateLevelUseCase::new(state.repo.clone());
    let level = use_case
        .execute(CreateLevelInput {
            name: req.name,
            answer: req.answer,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(LevelDto::from(&level))))
}

/// GET /api/servers
pub async fn list_servers<R>(
    State(state): State<AppState<R>>,
) -> LeaderboardResult<Json<Vec<ServerDto>>>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ListServersUseCase::new(state.repo.clone());
    let servers = use_case.execute().await?;

    Ok(Json(servers.iter().map(ServerDto::from).collect()))
}

/// POST /api/servers (admin)
pub async fn register_server<R>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    Json(req): Json<RegisterServerRequest>,
) -> LeaderboardResult<impl IntoResponse>
where
    R: TeamRepository
        + LevelRepository
        + SubmissionRepository
        + ServerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    check_admin(&state.config, &headers)?;

    let use_case = RegisterServerUseCase::new(state.repo.clone());
    let server = use_case
        .execute(RegisterServerInput {
            ip_address: req.ip_address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ServerDto::from(&server))))
}
