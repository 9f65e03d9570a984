use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::room::models::ConnectionId;
use crate::websockets::messages::WebSocketMessage;

/// Outbound delivery to live connections. Delivery is fire-and-forget: a
/// missing or broken recipient never surfaces an error to the caller.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<String>,
    );

    async fn remove_connection(&self, connection_id: &ConnectionId);

    async fn send_to_player(&self, connection_id: &ConnectionId, message: &str);

    async fn broadcast(&self, message: &str);
}

pub struct InMemoryConnectionManager {
    // connection id -> sender
    connections: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<String>,
    ) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.write().await;
        connections.remove(connection_id);
    }

    async fn send_to_player(&self, connection_id: &ConnectionId, message: &str) {
        let connections = self.connections.read().await;
        match connections.get(connection_id) {
            Some(sender) => {
                if sender.send(message.to_string()).is_err() {
                    debug!(connection_id = %connection_id, "Dropped message for closed connection");
                }
            }
            None => debug!(connection_id = %connection_id, "No connection to deliver to"),
        }
    }

    async fn broadcast(&self, message: &str) {
        let connections = self.connections.read().await;
        for (connection_id, sender) in connections.iter() {
            if sender.send(message.to_string()).is_err() {
                debug!(connection_id = %connection_id, "Dropped broadcast for closed connection");
            }
        }
    }
}

/// Serialises envelopes and hands them to a [`ConnectionManager`].
pub struct MessageBroadcaster;

impl MessageBroadcaster {
    pub async fn send_to(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &ConnectionId,
        message: &WebSocketMessage,
    ) {
        match message.to_json() {
            Ok(json) => connection_manager.send_to_player(connection_id, &json).await,
            Err(e) => warn!(error = %e, "Failed to serialize message"),
        }
    }

    pub async fn broadcast_all(
        connection_manager: &Arc<dyn ConnectionManager>,
        message: &WebSocketMessage,
    ) {
        match message.to_json() {
            Ok(json) => connection_manager.broadcast(&json).await,
            Err(e) => warn!(error = %e, "Failed to serialize message"),
        }
    }
}
