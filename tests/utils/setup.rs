use std::sync::Arc;
use std::time::Duration;

use niuniu::{
    config::ServerConfig,
    game::{Round, RoundCoordinator},
    room::{InMemoryRoomRegistry, Participant, PetNameGenerator, RoomService},
    shared::{AppError, AppState},
    websockets::{ConnectionManager, CooldownRateLimiter, RateLimiter, WebsocketReceiveHandler},
};
use tokio::sync::mpsc;

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub coordinator: Arc<RoundCoordinator>,
    pub room_service: Arc<RoomService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub input_handler: WebsocketReceiveHandler,
    pub config: ServerConfig,
    pub players: Vec<Participant>,
}

impl TestSetup {
    pub fn player(&self, name: &str) -> &Participant {
        self.players
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("{} is not a test player", name))
    }

    /// Registers another connection through the room service
    pub async fn connect(&mut self, name: &str) -> Result<Participant, AppError> {
        let (tx, _rx) = mpsc::unbounded_channel();
        let participant = self.room_service.connect(name, tx).await?;
        self.players.push(participant.clone());
        Ok(participant)
    }

    pub async fn disconnect(&self, name: &str) {
        let participant = self.player(name).clone();
        self.room_service
            .disconnect(&participant.connection_id)
            .await
            .unwrap();
    }

    /// AppState sharing this setup's components
    pub fn app_state(&self) -> AppState {
        let connection_manager: Arc<dyn ConnectionManager> = self.mock_conn_manager.clone();
        AppState::new(
            self.config.clone(),
            self.room_service.clone(),
            self.coordinator.clone(),
            connection_manager,
            self.rate_limiter.clone(),
        )
    }
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    seed: u64,
    max_connections: usize,
    send_interval: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            seed: 7,
            max_connections: 4,
            send_interval: Duration::ZERO,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "carol"])
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_send_interval(mut self, send_interval: Duration) -> Self {
        self.send_interval = send_interval;
        self
    }

    /// Connects every player, then discards the roster broadcasts
    pub async fn build(self) -> TestSetup {
        let config = ServerConfig {
            max_connections: self.max_connections,
            send_interval: self.send_interval,
            ..ServerConfig::default()
        };
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let connection_manager: Arc<dyn ConnectionManager> = mock_conn_manager.clone();

        let coordinator = Arc::new(RoundCoordinator::with_round(
            Round::with_seed(self.seed),
            connection_manager.clone(),
        ));
        let room_service = Arc::new(RoomService::new(
            Arc::new(InMemoryRoomRegistry::new(config.max_connections)),
            Arc::new(PetNameGenerator::new()),
            connection_manager.clone(),
            coordinator.clone(),
        ));
        let rate_limiter: Arc<dyn RateLimiter> =
            Arc::new(CooldownRateLimiter::new(config.send_interval));
        let input_handler = WebsocketReceiveHandler::new(
            connection_manager,
            coordinator.clone(),
            rate_limiter.clone(),
        );

        let mut setup = TestSetup {
            mock_conn_manager,
            coordinator,
            room_service,
            rate_limiter,
            input_handler,
            config,
            players: vec![],
        };
        for player in &self.players {
            setup.connect(player).await.unwrap();
        }
        setup.clear_messages().await;
        setup
    }
}
