// Library crate for the Niuniu round server
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod game;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{ConfigError, ServerConfig};
pub use game::{Round, RoundCoordinator};
pub use room::{ConnectionId, Participant, RoomService};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, WebSocketMessage, WebsocketReceiveHandler,
};
