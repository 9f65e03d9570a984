pub mod basic;
pub mod hand;

pub use basic::{Card, Joker, Rank, Suit};
pub use hand::{Hand, HandError, HAND_SIZE};
