//! Leaderboard Router

use crate::application::config::LeaderboardConfig;
use crate::domain::repository::{
    LevelRepository, ServerRepository, SubmissionRepository, TeamRepository,
};
use crate::infra::postgres::PgLeaderboardRepository;
use crate::presentation::handlers::{self, AppState};
use crate::presentation::middleware::{self, IdentityState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the leaderboard router with the PostgreSQL repository
pub fn leaderboard_router(repo: PgLeaderboardRepository, config: LeaderboardConfig) -> Router {
    leaderboard_router_generic(repo, config)
}

/// Create a generic leaderboard router for any repository implementation
pub fn leaderboard_router_generic<R>(repo: R, config: LeaderboardConfig) -> Router
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
    let config = Arc::new(config);
    let state = AppState {
        repo: Arc::new(repo),
        config: config.clone(),
    };
    let identity = IdentityState { config };

    Router::new()
        .route(
            "/team",
            get(handlers::team_status::<R>).post(handlers::create_team::<R>),
        )
        .route("/team/join", post(handlers::join_team::<R>))
        .route("/team/leave", post(handlers::leave_team::<R>))
        .route(
            "/submissions",
            get(handlers::submission_status::<R>).post(handlers::submit_answer::<R>),
        )
        .route("/levels", post(handlers::create_level::<R>))
        .route(
            "/servers",
            get(handlers::list_servers::<R>).post(handlers::register_server::<R>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            identity,
            middleware::require_identity,
        ))
        .with_state(state)
}
