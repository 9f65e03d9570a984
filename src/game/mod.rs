// Public API
pub use cards::{Card, Hand, HandError, Joker, Rank, Suit};
pub use coordinator::RoundCoordinator;
pub use deck::{Deck, DeckError};
pub use round::{EnrollmentStatus, Round, RoundError, RoundPhase, Seat, Settlement};
pub use scoring::{ScoreResult, ScoringError};

pub mod cards;
pub mod coordinator;
pub mod deck;
pub mod round;
pub mod scoring;
