//! Game Server Registry Use Cases

use crate::domain::entities::GameServer;
use crate::domain::repository::ServerRepository;
use crate::domain::value_objects::ValidationError;
use crate::error::LeaderboardResult;
use std::net::IpAddr;
use std::sync::Arc;

/// Input DTO for register server
#[derive(Debug, Clone)]
pub struct RegisterServerInput {
    pub ip_address: String,
}

/// Register Server Use Case
pub struct RegisterServerUseCase<R>
where
    R: ServerRepository,
{
    server_repo: Arc<R>,
}

impl<R> RegisterServerUseCase<R>
where
    R: ServerRepository,
{
    pub fn new(server_repo: Arc<R>) -> Self {
        Self { server_repo }
    }

    pub async fn execute(&self, input: RegisterServerInput) -> LeaderboardResult<GameServer> {
        let ip: IpAddr = input
            .ip_address
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidIpAddress)?;

        let server = GameServer::new(ip);
        self.server_repo.register(&server).await?;

        tracing::info!(server_id = %server.id, ip = %ip, "Game server registered");

        Ok(server)
    }
}

/// List Servers Use Case
pub struct ListServersUseCase<R>
where
    R: ServerRepository,
{
    server_repo: Arc<R>,
}

impl<R> ListServersUseCase<R>
where
    R: ServerRepository,
{
    pub fn new(server_repo: Arc<R>) -> Self {
        Self { server_repo }
    }

    pub async fn execute(&self) -> LeaderboardResult<Vec<GameServer>> {
        self.server_repo.list().await
    }
}
