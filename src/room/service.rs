use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{ConnectionId, Participant},
    names::NameGenerator,
    registry::{RegisterResult, RoomRegistry},
};
use crate::game::coordinator::RoundCoordinator;
use crate::shared::AppError;
use crate::websockets::connection_manager::{ConnectionManager, MessageBroadcaster};
use crate::websockets::messages::{escape_html, WebSocketMessage};

/// Service for connection admission and roster upkeep
pub struct RoomService {
    registry: Arc<dyn RoomRegistry>,
    name_generator: Arc<dyn NameGenerator>,
    connection_manager: Arc<dyn ConnectionManager>,
    coordinator: Arc<RoundCoordinator>,
}

impl RoomService {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        name_generator: Arc<dyn NameGenerator>,
        connection_manager: Arc<dyn ConnectionManager>,
        coordinator: Arc<RoundCoordinator>,
    ) -> Self {
        Self {
            registry,
            name_generator,
            connection_manager,
            coordinator,
        }
    }

    /// Escapes a requested display name, or generates a guest name if none was given.
    pub async fn resolve_name(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => escape_html(name),
            None => {
                let name = self.name_generator.generate().await;
                debug!(name = %name, "Assigned guest name");
                name
            }
        }
    }

    /// Early rejection before the websocket upgrade. `connect` re-checks atomically.
    pub async fn check_admission(&self, name: &str) -> Result<(), AppError> {
        if !self.registry.has_capacity().await? {
            return Err(AppError::CapacityExceeded);
        }
        if self.registry.is_name_taken(name).await? {
            return Err(AppError::NameTaken(name.to_string()));
        }
        Ok(())
    }

    /// Registers a participant, attaches its outbound channel and announces the new roster.
    #[instrument(skip(self, sender))]
    pub async fn connect(
        &self,
        name: &str,
        sender: mpsc::UnboundedSender<String>,
    ) -> Result<Participant, AppError> {
        let participant = match self.registry.try_register(name).await? {
            RegisterResult::Registered(participant) => participant,
            RegisterResult::CapacityExceeded => {
                warn!("Connection refused, server at capacity");
                return Err(AppError::CapacityExceeded);
            }
            RegisterResult::NameTaken => {
                warn!("Connection refused, name already taken");
                return Err(AppError::NameTaken(name.to_string()));
            }
        };

        self.connection_manager
            .add_connection(participant.connection_id, sender)
            .await;

        info!(connection_id = %participant.connection_id, "Participant connected");
        self.broadcast_roster().await?;
        Ok(participant)
    }

    /// Tears down a connection: releases any round seat it holds, then frees
    /// the name and announces the new roster.
    #[instrument(skip(self))]
    pub async fn disconnect(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Participant>, AppError> {
        self.connection_manager.remove_connection(connection_id).await;
        self.coordinator.release(connection_id).await;

        let Some(participant) = self.registry.unregister(connection_id).await? else {
            debug!("Connection was never registered");
            return Ok(None);
        };

        info!(player = %participant.name, "Participant disconnected");
        self.broadcast_roster().await?;
        Ok(Some(participant))
    }

    pub async fn participant(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Participant>, AppError> {
        self.registry.participant(connection_id).await
    }

    pub async fn roster(&self) -> Result<Vec<String>, AppError> {
        self.registry.roster().await
    }

    pub async fn broadcast_roster(&self) -> Result<(), AppError> {
        let roster = self.registry.roster().await?;
        debug!(players = ?roster, "Broadcasting roster");
        MessageBroadcaster::broadcast_all(&self.connection_manager, &WebSocketMessage::list(roster))
            .await;
        Ok(())
    }
}
