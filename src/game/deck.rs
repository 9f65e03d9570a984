use rand::Rng;
use thiserror::Error;

use crate::game::cards::{Card, Hand, HandError, HAND_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("Deck exhausted: {remaining} cards left, {requested} requested")]
    Exhausted { remaining: usize, requested: usize },
    #[error("Dealt an invalid hand: {0}")]
    InvalidHand(#[from] HandError),
}

/// The card pool for one round. Cards only ever leave it by being dealt.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds the full universe in canonical order.
    pub fn new(exclude_jokers: bool) -> Self {
        Self {
            cards: Card::all_cards(exclude_jokers),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// How many full hands this deck can still produce.
    pub fn hands_remaining(&self) -> usize {
        self.cards.len() / HAND_SIZE
    }

    /// Draws a hand by repeatedly removing a uniformly random remaining card.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Hand, DeckError> {
        if self.cards.len() < HAND_SIZE {
            return Err(DeckError::Exhausted {
                remaining: self.cards.len(),
                requested: HAND_SIZE,
            });
        }

        let mut drawn = Vec::with_capacity(HAND_SIZE);
        for _ in 0..HAND_SIZE {
            let idx = rng.random_range(0..self.cards.len());
            drawn.push(self.cards.remove(idx));
        }

        Ok(Hand::from_cards(&drawn)?)
    }
}
