//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use niuniu::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.iter().map(|p| p.name.as_str()).collect();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&'a str>) -> Self {
        Self { setup, players }
    }

    /// Assert that every player received the same next message of a type (consumes it)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let contents = self.received_each(expected_type).await;
        for (i, content) in contents.iter().enumerate().skip(1) {
            assert_eq!(
                content.data, contents[0].data,
                "{} payload differs from {}",
                self.players[i], self.players[0]
            );
        }
        contents
            .into_iter()
            .next()
            .expect("at least one player to assert on")
    }

    /// Assert that every player received a next message of a type, payloads may differ (consumes it)
    pub async fn received_each(&self, expected_type: MessageType) -> Vec<MessageContent> {
        let mut contents = vec![];

        for player in &self.players {
            let connection_id = self.setup.player(player).connection_id;
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(&connection_id)
                .await;
            assert!(
                message.is_some(),
                "{} should have received a message",
                player
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type: {:?}",
                player, msg
            );
            contents.push(MessageContent {
                data: msg.data,
                from: msg.from,
            });
        }

        contents
    }

    /// Assert that players have no pending messages
    pub async fn received_no_messages(self) {
        for player in &self.players {
            let connection_id = self.setup.player(player).connection_id;
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(&connection_id)
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                player,
                messages
            );
        }
    }

    /// Count pending messages of a specific type for a player (non-consuming)
    pub async fn count_message_type(&self, player: &str, msg_type: MessageType) -> usize {
        let connection_id = self.setup.player(player).connection_id;
        let messages = self
            .setup
            .mock_conn_manager
            .get_messages_for(&connection_id)
            .await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

#[derive(Debug)]
pub struct MessageContent {
    pub data: serde_json::Value,
    pub from: String,
}

impl MessageContent {
    pub fn text(&self) -> String {
        match &self.data {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Assert the message has a specific sender
    pub fn with_sender(self, expected_sender: &str) -> Self {
        assert_eq!(self.from, expected_sender);
        self
    }

    /// Assert the message carries exactly this text
    pub fn with_text(self, expected_text: &str) -> Self {
        assert_eq!(self.text(), expected_text);
        self
    }

    /// Assert the message text starts with a prefix
    pub fn with_text_prefix(self, prefix: &str) -> Self {
        let text = self.text();
        assert!(
            text.starts_with(prefix),
            "expected {:?} to start with {:?}",
            text,
            prefix
        );
        self
    }

    /// Assert the message is a roster with exactly these names
    pub fn with_roster(self, expected: Vec<&str>) -> Self {
        let names: Vec<String> = serde_json::from_value(self.data.clone()).unwrap();
        assert_eq!(names, expected);
        self
    }

    /// Split a deal notice into its card labels and hand label
    pub fn deal_notice(&self) -> (Vec<String>, String) {
        let text = self.text();
        let (cards, label) = text
            .split_once(' ')
            .unwrap_or_else(|| panic!("not a deal notice: {:?}", text));
        (
            cards.split(',').map(String::from).collect(),
            label.to_string(),
        )
    }
}
