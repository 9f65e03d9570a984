use async_trait::async_trait;
use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::game::coordinator::RoundCoordinator;
use crate::game::round::Seat;
use crate::room::models::Participant;
use crate::shared::{AppError, AppState};
use crate::websockets::connection_manager::{ConnectionManager, MessageBroadcaster};
use crate::websockets::messages::{escape_html, Command, Inbound, InboundMessage, WebSocketMessage};
use crate::websockets::rate_limiter::RateLimiter;

use super::socket::{Connection, MessageHandler, SocketWrapper};

/// Message handler for receiving WebSocket messages from the client
pub struct WebsocketReceiveHandler {
    connection_manager: Arc<dyn ConnectionManager>,
    coordinator: Arc<RoundCoordinator>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl WebsocketReceiveHandler {
    pub fn new(
        connection_manager: Arc<dyn ConnectionManager>,
        coordinator: Arc<RoundCoordinator>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            connection_manager,
            coordinator,
            rate_limiter,
        }
    }

    pub fn from_state(app_state: &AppState) -> Self {
        Self::new(
            app_state.connection_manager.clone(),
            app_state.coordinator.clone(),
            app_state.rate_limiter.clone(),
        )
    }

    async fn dispatch(&self, participant: &Participant, raw: &str) -> Result<(), AppError> {
        let command = match InboundMessage::decode(raw)? {
            Inbound::Send(command) => command,
            Inbound::Other(message_type) => {
                debug!(message_type = %message_type, "Ignoring unhandled message type");
                return Ok(());
            }
        };

        if !self
            .rate_limiter
            .allow(&participant.connection_id.to_string())
        {
            return Err(AppError::RateLimited);
        }

        match command {
            Command::JoinRound => {
                let seat = Seat::new(participant.name.clone(), participant.connection_id);
                self.coordinator.join(seat).await?;
            }
            Command::Settle => {
                self.coordinator.settle(&participant.connection_id).await?;
            }
            Command::Chat(text) => {
                let chat = WebSocketMessage::send(participant.name.clone(), escape_html(&text));
                MessageBroadcaster::broadcast_all(&self.connection_manager, &chat).await;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, participant: &Participant, message: String) {
        debug!(
            connection_id = %participant.connection_id,
            player = %participant.name,
            message = %message,
            "Received message"
        );

        match self.dispatch(participant, &message).await {
            Ok(()) => {}
            // Round-fatal errors were already broadcast to everyone.
            Err(AppError::Round(e)) if e.is_invariant_violation() => {}
            Err(e) => {
                warn!(
                    connection_id = %participant.connection_id,
                    player = %participant.name,
                    error = %e,
                    "Rejected message"
                );
                MessageBroadcaster::send_to(
                    &self.connection_manager,
                    &participant.connection_id,
                    &WebSocketMessage::error(e.to_string()),
                )
                .await;
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub name: Option<String>,
}

/// WebSocket endpoint
/// GET /ws?name=<display name>; capacity and name checks happen before the upgrade
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let name = app_state
        .room_service
        .resolve_name(params.name.as_deref())
        .await;
    info!(player = %name, "WebSocket connection requested");

    if let Err(e) = app_state.room_service.check_admission(&name).await {
        warn!(player = %name, error = %e, "Rejecting WebSocket connection");
        return Err(e);
    }

    Ok(ws.on_upgrade(move |socket| handle_websocket_connection(Box::new(socket), name, app_state)))
}

/// Drives an upgraded socket from registration to disconnect cleanup
pub async fn handle_websocket_connection(
    mut socket: Box<dyn SocketWrapper>,
    name: String,
    app_state: AppState,
) {
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    // Another connection may have taken the last slot or this name since the pre-upgrade check.
    let participant = match app_state.room_service.connect(&name, outbound_sender).await {
        Ok(participant) => participant,
        Err(e) => {
            warn!(player = %name, error = %e, "Registration failed after upgrade");
            if let Ok(json) = WebSocketMessage::error(e.to_string()).to_json() {
                let _ = socket.send_message(json).await;
            }
            let _ = socket.close().await;
            return;
        }
    };
    let connection_id = participant.connection_id;

    info!(
        connection_id = %connection_id,
        player = %name,
        "WebSocket connection established"
    );

    let message_handler = Arc::new(WebsocketReceiveHandler::from_state(&app_state));
    let connection = Connection::new(participant, socket, outbound_receiver, message_handler);

    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, player = %name, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                player = %name,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    if let Err(e) = app_state.room_service.disconnect(&connection_id).await {
        warn!(connection_id = %connection_id, error = %e, "Disconnect cleanup failed");
    }
}
