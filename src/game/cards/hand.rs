use std::fmt;
use thiserror::Error;

use super::basic::Card;

pub const HAND_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("Invalid hand size: expected 5 cards, got {0}")]
    InvalidHandSize(usize),
    #[error("Duplicate card in hand: {0}")]
    DuplicateCard(Card),
    #[error("Jokers cannot be dealt: {0}")]
    JokerInHand(Card),
    #[error("Invalid card: {0}")]
    InvalidCard(String),
}

/// Exactly five distinct suited cards dealt to one participant.
/// Serialised as a list of card labels; deserialising validates it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(into = "Vec<Card>", try_from = "Vec<Card>")]
pub struct Hand {
    cards: [Card; HAND_SIZE],
}

impl Hand {
    pub fn from_cards(cards: &[Card]) -> Result<Self, HandError> {
        let cards: [Card; HAND_SIZE] = cards
            .try_into()
            .map_err(|_| HandError::InvalidHandSize(cards.len()))?;

        for (i, card) in cards.iter().enumerate() {
            if card.is_joker() {
                return Err(HandError::JokerInHand(*card));
            }
            if cards[..i].contains(card) {
                return Err(HandError::DuplicateCard(*card));
            }
        }

        Ok(Self { cards })
    }

    pub fn from_labels(labels: &[&str]) -> Result<Self, HandError> {
        let cards = labels
            .iter()
            .map(|label| Card::from_label(label))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cards(&cards)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn labels(&self) -> Vec<String> {
        self.cards.iter().map(Card::to_string).collect()
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = HandError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Self::from_cards(&cards)
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards.to_vec()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join(","))
    }
}
