use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use super::models::{ConnectionId, Participant};
use crate::shared::AppError;

/// Result of attempting to register a new connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterResult {
    /// Registered; returns the new participant
    Registered(Participant),
    /// The connection cap has been reached
    CapacityExceeded,
    /// Another live connection already uses this display name
    NameTaken,
}

/// Trait for participant registry operations
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Atomically checks capacity and name uniqueness, then registers
    async fn try_register(&self, name: &str) -> Result<RegisterResult, AppError>;

    /// Removes a connection and frees its display name
    async fn unregister(&self, connection_id: &ConnectionId)
        -> Result<Option<Participant>, AppError>;

    async fn participant(&self, connection_id: &ConnectionId)
        -> Result<Option<Participant>, AppError>;

    /// Sorted snapshot of every registered display name
    async fn roster(&self) -> Result<Vec<String>, AppError>;

    async fn is_name_taken(&self, name: &str) -> Result<bool, AppError>;

    async fn has_capacity(&self) -> Result<bool, AppError>;
}

#[derive(Default)]
struct Registry {
    participants: HashMap<ConnectionId, Participant>,
    names: BTreeSet<String>,
}

/// In-memory implementation of RoomRegistry
pub struct InMemoryRoomRegistry {
    max_connections: usize,
    inner: Mutex<Registry>,
}

impl InMemoryRoomRegistry {
    pub fn new(max_connections: usize) -> Self {
        Self {
            max_connections,
            inner: Mutex::new(Registry::default()),
        }
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    fn lock(&self) -> Result<MutexGuard<'_, Registry>, AppError> {
        self.inner.lock().map_err(|_| AppError::Internal)
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self))]
    async fn try_register(&self, name: &str) -> Result<RegisterResult, AppError> {
        let mut registry = self.lock()?;

        if registry.participants.len() >= self.max_connections {
            debug!(
                connected = registry.participants.len(),
                max = self.max_connections,
                "Registry at capacity"
            );
            return Ok(RegisterResult::CapacityExceeded);
        }
        if registry.names.contains(name) {
            debug!("Display name already in use");
            return Ok(RegisterResult::NameTaken);
        }

        let participant = Participant::new(name.to_string());
        registry.names.insert(participant.name.clone());
        registry
            .participants
            .insert(participant.connection_id, participant.clone());

        info!(
            connection_id = %participant.connection_id,
            connected = registry.participants.len(),
            "Participant registered"
        );
        Ok(RegisterResult::Registered(participant))
    }

    #[instrument(skip(self))]
    async fn unregister(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Participant>, AppError> {
        let mut registry = self.lock()?;

        let removed = registry.participants.remove(connection_id);
        if let Some(participant) = &removed {
            registry.names.remove(&participant.name);
            info!(player = %participant.name, "Participant unregistered");
        }
        Ok(removed)
    }

    async fn participant(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Participant>, AppError> {
        Ok(self.lock()?.participants.get(connection_id).cloned())
    }

    async fn roster(&self) -> Result<Vec<String>, AppError> {
        Ok(self.lock()?.names.iter().cloned().collect())
    }

    async fn is_name_taken(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.names.contains(name))
    }

    async fn has_capacity(&self) -> Result<bool, AppError> {
        Ok(self.lock()?.participants.len() < self.max_connections)
    }
}
