use serde_json::json;

use niuniu::websockets::MessageHandler;

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Deliver a raw client frame as if it arrived on the player's socket
    pub async fn send_raw(&self, player: &str, raw: &str) {
        let participant = self.player(player).clone();
        self.input_handler
            .handle_message(&participant, raw.to_string())
            .await;
    }

    /// Send a `send` envelope carrying the given text
    pub async fn send_text(&self, player: &str, data: &str) {
        let message = json!({ "type": "send", "data": data }).to_string();
        self.send_raw(player, &message).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn join_round(&self, player: &str) {
        self.send_text(player, "111").await;
    }

    pub async fn settle(&self, player: &str) {
        self.send_text(player, "result").await;
    }

    pub async fn chat(&self, player: &str, text: &str) {
        self.send_text(player, text).await;
    }
}
