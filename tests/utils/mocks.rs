use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, RwLock};

use niuniu::room::ConnectionId;
use niuniu::websockets::{ConnectionManager, SocketError, SocketWrapper};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every outbound message per connection instead of delivering it
#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<ConnectionId, VecDeque<String>>>>,
    // senders are held so a live Connection keeps its outbound channel open
    connected: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
            connected: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get_messages_for(&self, connection_id: &ConnectionId) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(connection_id)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest message recorded for a connection
    pub async fn consume_message_for(&self, connection_id: &ConnectionId) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(connection_id)
            .and_then(|queue| queue.pop_front())
    }

    pub async fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connected.read().await.contains_key(connection_id)
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<String>,
    ) {
        self.connected.write().await.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) {
        self.connected.write().await.remove(connection_id);
    }

    async fn send_to_player(&self, connection_id: &ConnectionId, message: &str) {
        if !self.is_connected(connection_id).await {
            return;
        }
        self.sent_messages
            .write()
            .await
            .entry(*connection_id)
            .or_default()
            .push_back(message.to_string());
    }

    async fn broadcast(&self, message: &str) {
        let connected: Vec<ConnectionId> = self.connected.read().await.keys().copied().collect();
        for connection_id in connected {
            self.send_to_player(&connection_id, message).await;
        }
    }
}

/// Socket that replays scripted client frames, then reports the client gone
pub struct ScriptedSocket {
    inbound: VecDeque<String>,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<Mutex<bool>>,
}

impl ScriptedSocket {
    pub fn new(inbound: Vec<&str>) -> Self {
        Self {
            inbound: inbound.into_iter().map(String::from).collect(),
            sent: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
        }
    }
}

#[async_trait]
impl SocketWrapper for ScriptedSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        Ok(self.inbound.pop_front())
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}
