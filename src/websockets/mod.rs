// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager, MessageBroadcaster};
pub use handler::{handle_websocket_connection, websocket_handler, WebsocketReceiveHandler};
pub use messages::{Command, Inbound, InboundMessage, MessageType, WebSocketMessage};
pub use rate_limiter::{CooldownRateLimiter, RateLimiter};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

pub mod connection_manager;
mod handler;
pub mod messages;
pub mod rate_limiter;
mod socket;
