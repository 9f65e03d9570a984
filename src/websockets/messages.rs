use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::AppError;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    // Client -> Server, and chat / game text Server -> Client
    Send,

    // Server -> Client
    List,
    Error,
}

/// Envelope for every message on the socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub data: Value,
    #[serde(default)]
    pub from: String,
}

/// Raw inbound envelope before validation
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub data: Option<Value>,
}

/// A validated inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Send(Command),
    /// Any other message type; accepted and ignored
    Other(String),
}

/// What a `send` message asks the server to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    JoinRound,
    Settle,
    Chat(String),
}

pub const JOIN_COMMAND: &str = "111";
pub const SETTLE_COMMANDS: [&str; 4] = ["result", "end", "结果", "结束"];

impl Command {
    pub fn parse(data: &str) -> Self {
        if data == JOIN_COMMAND {
            Command::JoinRound
        } else if SETTLE_COMMANDS.contains(&data) {
            Command::Settle
        } else {
            Command::Chat(data.to_string())
        }
    }
}

impl InboundMessage {
    /// Decodes and validates a raw client frame.
    pub fn decode(raw: &str) -> Result<Inbound, AppError> {
        let message: InboundMessage =
            serde_json::from_str(raw).map_err(|e| AppError::MalformedMessage(e.to_string()))?;
        message.validate()
    }

    fn validate(self) -> Result<Inbound, AppError> {
        let message_type = self
            .message_type
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Validation("type is required".to_string()))?;

        let data = match self.data {
            None | Some(Value::Null) => {
                return Err(AppError::Validation("data is required".to_string()))
            }
            Some(data) => data,
        };

        match message_type.as_str() {
            "send" => Ok(Inbound::Send(Command::parse(&data_as_text(&data)))),
            _ => Ok(Inbound::Other(message_type)),
        }
    }
}

/// Renders a JSON payload as plain text; strings lose their quotes.
pub fn data_as_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escapes text for safe display in an HTML client.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, data: Value, from: impl Into<String>) -> Self {
        Self {
            message_type,
            data,
            from: from.into(),
        }
    }

    /// Create a `send` message carrying text
    pub fn send(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(MessageType::Send, Value::String(text.into()), from)
    }

    /// Create a `list` message with the sorted roster
    pub fn list(names: Vec<String>) -> Self {
        Self::new(MessageType::List, Value::from(names), "")
    }

    /// Create an `error` message
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(MessageType::Error, Value::String(message.into()), "")
    }

    pub fn text(&self) -> String {
        data_as_text(&self.data)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
