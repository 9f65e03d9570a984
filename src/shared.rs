use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::game::coordinator::RoundCoordinator;
use crate::game::round::{Round, RoundError};
use crate::room::{InMemoryRoomRegistry, PetNameGenerator, RoomService};
use crate::websockets::connection_manager::{ConnectionManager, InMemoryConnectionManager};
use crate::websockets::rate_limiter::{CooldownRateLimiter, RateLimiter};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub room_service: Arc<RoomService>,
    pub coordinator: Arc<RoundCoordinator>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        room_service: Arc<RoomService>,
        coordinator: Arc<RoundCoordinator>,
        connection_manager: Arc<dyn ConnectionManager>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            config,
            room_service,
            coordinator,
            connection_manager,
            rate_limiter,
        }
    }

    /// Wires the in-memory registry, coordinator and limiter for a config.
    pub fn from_config(config: ServerConfig) -> Self {
        Self::with_round(config, Round::new())
    }

    pub fn with_round(config: ServerConfig, round: Round) -> Self {
        let connection_manager: Arc<dyn ConnectionManager> =
            Arc::new(InMemoryConnectionManager::new());
        let coordinator = Arc::new(RoundCoordinator::with_round(
            round,
            connection_manager.clone(),
        ));
        let room_service = Arc::new(RoomService::new(
            Arc::new(InMemoryRoomRegistry::new(config.max_connections)),
            Arc::new(PetNameGenerator::new()),
            connection_manager.clone(),
            coordinator.clone(),
        ));
        let rate_limiter = Arc::new(CooldownRateLimiter::new(config.send_interval));

        Self::new(
            config,
            room_service,
            coordinator,
            connection_manager,
            rate_limiter,
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("you are sending messages too frequently, please wait and retry")]
    RateLimited,

    #[error("the server is full, please try again later")]
    CapacityExceeded,

    #[error("the name {0} is already taken")]
    NameTaken(String),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedMessage(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::CapacityExceeded => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NameTaken(_) => StatusCode::CONFLICT,
            AppError::Round(e) if e.is_invariant_violation() => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Round(_) => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
